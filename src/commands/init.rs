//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join("_config.yml").exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("static/docs/folio"))?;

    let config_content = r#"# Site
title: Portfolio
description: ''
author: John Doe
language: en

# URL
url: http://localhost:4000
root: /

# Directory
posts_dir: content/posts
public_dir: public
static_dir: static
projects_file: projects.yml

# Project documentation fetched at display time
docs_base_url: http://localhost:4000

# Contact form recipient
contact_email: hello@example.com

# Activity graph; random decorative data when unset
# contributions_file: contributions.json
github_username: ''

# Writing
allow_raw_html: true
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Server
server_ip: localhost
server_port: 4000
"#;
    fs::write(target_dir.join("_config.yml"), config_content)?;

    let projects = r#"projects:
  - slug: folio
    name: Folio
    description: The content pipeline behind this site
    tags: [rust, markdown]
    repository: https://github.com/example/folio
    content:
      readme:
        inline: |
          # Folio

          Posts, projects and search for a personal site.
      architecture:
        remote: /docs/folio/architecture.md
"#;
    fs::write(target_dir.join("projects.yml"), projects)?;

    fs::write(
        target_dir.join("static/docs/folio/architecture.md"),
        "# Architecture\n\nContent store, loader, renderer.\n",
    )?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
summary: The first post on this site
categories:
  - meta
---

Welcome! This post lives in `content/posts/hello-world.md`.

## Writing posts

```bash
$ folio new "My New Post"
```

## Previewing

```bash
$ folio server
```
"#,
        now.format("%Y-%m-%d")
    );
    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_is_loadable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let posts = folio.loader().list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].categories, vec!["meta"]);

        let projects = folio.projects().unwrap();
        assert_eq!(projects.get("folio").unwrap().content.available().len(), 2);

        assert!(init_site(dir.path()).is_err());
    }
}
