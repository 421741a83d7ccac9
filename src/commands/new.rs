//! Create a new post or page

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentKind;
use crate::Site;

/// Create a document under `posts/` or `pages/` with a starter header.
///
/// The file name is the slugified title. Returns the path written.
pub fn create_document(site: &Site, title: &str, kind: ContentKind) -> Result<PathBuf> {
    if kind == ContentKind::Settings {
        anyhow::bail!("Settings documents are not created with `new`");
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    let target_dir = site.content_dir.join(kind.dir_name());
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = match kind {
        ContentKind::Posts => format!(
            "---\ntitle: {}\ndescription: \ndate: {}\ncategory: Direito\nimage: \n---\n",
            title,
            now.format("%Y-%m-%d %H:%M:%S")
        ),
        _ => format!("---\ntitle: {}\n---\n", title),
    };

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, kind: ContentKind) -> Result<PathBuf> {
    create_document(site, title, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LoadState;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_is_fetchable() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = site.new_post("Direitos do Consumidor").unwrap();
        assert!(path.ends_with("content/posts/direitos-do-consumidor.md"));

        match site.store().fetch(ContentKind::Posts, "direitos-do-consumidor") {
            LoadState::Found(doc) => {
                assert_eq!(doc.metadata.get("title"), Some("Direitos do Consumidor"));
                assert!(doc.metadata.date("date").is_some());
                assert_eq!(doc.metadata.text("description"), None);
            }
            LoadState::NotFound => panic!("new post not found"),
        }
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        run(&site, "Sobre", ContentKind::Pages).unwrap();
        assert!(run(&site, "Sobre", ContentKind::Pages).is_err());
    }

    #[test]
    fn test_new_rejects_settings_and_empty_titles() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site, "general", ContentKind::Settings).is_err());
        assert!(run(&site, "!!!", ContentKind::Posts).is_err());
    }
}
