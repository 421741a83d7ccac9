//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::ContentKind;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
url: http://localhost:4000
language: pt-BR

# Directory
content_dir: content
public_dir: public

# Markdown
render:
  breaks: true
  gfm: true
  embed_videos: true
  external_links: true
  lazy_images: true
  highlight_code: true
  highlight_theme: InspiredGitHub

# CMS login. Prefer GITHUB_CLIENT_ID / GITHUB_CLIENT_SECRET in the environment.
oauth:
  scope: repo,user
  admin_path: /admin/
"#;

const GENERAL_SETTINGS: &str = r#"---
siteName: Edson Silva Maltez
oab: OAB/SP 344.956
phone: (19) 99631-9810
whatsapp: 5519996319810
email: dredsonmaltez@gmail.com
address: Rua Francisco Biancalana, 31 - sala 02 - Vila Santana, Sumaré - SP
instagram: #
linkedin: #
facebook: #
---
"#;

const HOME_PAGE: &str = r#"---
heroTitle: Excelência e Compromisso em Direito
heroSubtitle: Há mais de 12 anos defendendo seus direitos com ética, dedicação e soluções jurídicas eficientes.
experience: 12
cases: 350
---
"#;

const ABOUT_PAGE: &str = r#"---
title: Sobre
---
Formado pela PUC Campinas, atua nas áreas de **Direito Civil**, **Trabalhista** e **Criminal**.
"#;

const CONTACT_PAGE: &str = r#"---
title: Contato
---
Atendimento presencial e online. Agende sua consulta.
"#;

/// Initialize a new site in the given directory.
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let content = target_dir.join("content");
    for kind in [ContentKind::Settings, ContentKind::Pages, ContentKind::Posts] {
        fs::create_dir_all(content.join(kind.dir_name()))?;
    }
    fs::create_dir_all(target_dir.join("public/images"))?;
    fs::create_dir_all(target_dir.join("public/admin"))?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Bem-vindo ao blog
description: Primeiro artigo do escritório.
date: {}
category: Direito
author: Edson Silva Maltez
---
Este é o primeiro artigo. Edite ou apague em `content/posts/bem-vindo.md`.

Links do YouTube viram players:

https://www.youtube.com/watch?v=dQw4w9WgXcQ
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    let files = [
        (target_dir.join(CONFIG_FILE), CONFIG_TEMPLATE.to_string()),
        (content.join("settings/general.md"), GENERAL_SETTINGS.to_string()),
        (content.join("pages/home.md"), HOME_PAGE.to_string()),
        (content.join("pages/sobre.md"), ABOUT_PAGE.to_string()),
        (content.join("pages/contato.md"), CONTACT_PAGE.to_string()),
        (content.join("posts/bem-vindo.md"), sample_post),
    ];

    for (path, body) in files {
        if path.exists() {
            tracing::debug!("Keeping existing {:?}", path);
            continue;
        }
        fs::write(&path, body)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::load_posts;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        let settings = site.settings(Some("home"));
        assert_eq!(settings.oab, "OAB/SP 344.956");
        assert_eq!(settings.experience, 12);

        let posts = load_posts(&site.store());
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Bem-vindo ao blog");
        assert!(posts[0].date.is_some());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "url: https://example.com\n").unwrap();
        init_site(dir.path()).unwrap();

        let config = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, "url: https://example.com\n");
    }
}
