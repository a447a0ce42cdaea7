//! Subcommand handlers
//!
//! Each handler works on an open session; `run` opens it on the file store
//! and closes it afterwards so the forest is flushed exactly once more.

use anyhow::{anyhow, bail, Context, Result};
use familytree_core::services::transfer::export_file_name;
use familytree_core::{FamilyTreeSession, FileStore, Person, PersonFields};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::render;
use crate::{AddArgs, Command};

type Session = FamilyTreeSession<FileStore>;

pub fn run(config: &AppConfig, command: Command) -> Result<()> {
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let mut session = FamilyTreeSession::open(store)?;

    execute(&mut session, command)?;

    session.close()?;
    Ok(())
}

fn execute(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Show { json } => show(session, json),
        Command::Add(args) => add(session, args),
        Command::AddMany { parent_id, names } => add_many(session, &parent_id, names),
        Command::Update { id, field, value } => {
            if !session.store_mut().update_field(&id, field, value)? {
                bail!("No person with id {id}");
            }
            println!("Updated {field} of {id}");
            Ok(())
        }
        Command::Delete { id, yes } => delete(session, &id, yes),
        Command::Search { query } => {
            let hits = session.search(&query);
            if hits.is_empty() {
                println!("No matches for {query:?}");
            }
            for person in hits {
                println!("{}", render::person_line(person, session.clock()));
            }
            Ok(())
        }
        Command::Stats { json } => {
            let stats = session.statistics();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::statistics(&stats));
            }
            Ok(())
        }
        Command::Layout { json } => {
            let layout = session.layout();
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                print!("{}", render::layout(session.store().forest(), &layout));
            }
            Ok(())
        }
        Command::Export { output } => export(session, output),
        Command::Import { path } => import(session, &path),
        Command::Reset { yes } => {
            require_confirmation(yes, "reset the whole tree")?;
            let root_id = session.store_mut().reset_to_default()?;
            println!("Tree reset, new root {root_id}");
            Ok(())
        }
        Command::Sample => {
            session.store_mut().add_sample_family()?;
            print!("{}", render::outline(session.store().forest(), session.clock()));
            Ok(())
        }
        Command::Profile { profile } => {
            if let Some(profile) = profile {
                session.set_spacing_profile(profile)?;
            }
            let profile = session.spacing_profile();
            let spacing = profile.spacing();
            println!(
                "{profile} (horizontal {}, vertical {})",
                spacing.horizontal, spacing.vertical
            );
            Ok(())
        }
        Command::Background { value } => {
            if let Some(value) = value {
                if !session.set_background(&value)? {
                    println!("Empty background ignored");
                }
            }
            println!("{}", session.background().unwrap_or("(default)"));
            Ok(())
        }
    }
}

fn show(session: &Session, json: bool) -> Result<()> {
    if json {
        println!("{}", session.store().export_json()?);
    } else {
        print!("{}", render::outline(session.store().forest(), session.clock()));
    }
    Ok(())
}

fn add(session: &mut Session, args: AddArgs) -> Result<()> {
    let AddArgs {
        parent_id,
        name,
        birth,
        death,
        gender,
        image,
        notes,
        relationship,
    } = args;

    let fields = PersonFields {
        name,
        birth,
        death,
        gender,
        image,
        notes,
        relationship,
        children: Vec::new(),
    };

    let id = session
        .store_mut()
        .add_child(&parent_id, fields)?
        .ok_or_else(|| anyhow!("No person with id {parent_id}"))?;
    println!("{id}");
    Ok(())
}

fn add_many(session: &mut Session, parent_id: &str, names: Vec<String>) -> Result<()> {
    let count = names.len();
    let children = names
        .into_iter()
        .map(|name| PersonFields::new().with_name(name))
        .collect();

    if !session.store_mut().add_children(parent_id, children)? {
        bail!("No person with id {parent_id}");
    }
    if let Some(parent) = session.store().find_by_id(parent_id) {
        for child in newest_children(parent, count) {
            println!("{}\t{}", child.id, child.name);
        }
    }
    Ok(())
}

/// The last `count` children, which are the ones just appended.
fn newest_children(parent: &Person, count: usize) -> &[Person] {
    let start = parent.children.len().saturating_sub(count);
    &parent.children[start..]
}

fn delete(session: &mut Session, id: &str, yes: bool) -> Result<()> {
    let is_root = session.store().root_id() == id;
    let what = if is_root {
        "reset the whole tree".to_string()
    } else {
        let removed = session
            .store()
            .find_by_id(id)
            .ok_or_else(|| anyhow!("No person with id {id}"))?
            .subtree_size();
        format!("delete {removed} people")
    };
    require_confirmation(yes, &what)?;

    session.store_mut().delete_person(id)?;
    if is_root {
        println!("Tree reset, new root {}", session.store().root_id());
    } else {
        println!("Deleted {id}");
    }
    Ok(())
}

fn export(session: &Session, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(session.clock().today())));
    let json = session.store().export_json()?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    println!(
        "Exported {} people to {}",
        session.store().person_count(),
        path.display()
    );
    Ok(())
}

fn import(session: &mut Session, path: &Path) -> Result<()> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let count = session.store_mut().import_json(&text)?;
    println!("Imported {count} people from {}", path.display());
    Ok(())
}

fn require_confirmation(yes: bool, what: &str) -> Result<()> {
    if !yes {
        bail!("This will {what}; re-run with --yes to confirm");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Session {
        FamilyTreeSession::open(FileStore::open(dir.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        session.store_mut().add_sample_family().unwrap();
        let id = session.store().root().children[0].id.clone();

        assert!(delete(&mut session, &id, false).is_err());
        assert_eq!(session.store().person_count(), 5);

        delete(&mut session, &id, true).unwrap();
        assert_eq!(session.store().person_count(), 3);
    }

    #[test]
    fn test_add_unknown_parent_fails() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        assert!(add_many(&mut session, "missing", vec!["X".to_string()]).is_err());
        assert_eq!(session.store().person_count(), 1);
    }

    #[test]
    fn test_add_many_reports_only_new_children() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        session.store_mut().add_sample_family().unwrap();
        let root_id = session.store().root_id().to_string();

        add_many(
            &mut session,
            &root_id,
            vec!["Dora".to_string(), "Emil".to_string()],
        )
        .unwrap();

        let root = session.store().root();
        let names: Vec<_> = newest_children(root, 2).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dora", "Emil"]);
        assert_eq!(root.children.len(), 5);
        assert!(newest_children(root, 0).is_empty());
    }

    #[test]
    fn test_export_then_import_in_new_directory() {
        let source_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        let file = source_dir.path().join("family.json");

        let mut source = session_in(&source_dir);
        source.store_mut().add_sample_family().unwrap();
        export(&source, Some(file.clone())).unwrap();

        let mut target = session_in(&target_dir);
        import(&mut target, &file).unwrap();
        assert_eq!(target.store().forest(), source.store().forest());
    }
}
