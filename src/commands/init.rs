//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/blog"))?;

    let config_path = target_dir.join("config.yml");
    if config_path.exists() {
        anyhow::bail!("config.yml already exists in {:?}", target_dir);
    }

    let config_content = r#"# Site
title: Portfolio
description: ''
author: John Doe

# URL
base_url: http://example.com
root: /

# Directory
source_dir: content
public_dir: public
blog_dir: blog
category_dir: categories
pagination_dir: page

# Content
per_page: 4
summary_length: 150
related_posts: 3
render_drafts: false

# Theme
theme:
  default: light
  allow_toggle: true

# Contact page
contact:
  email: ''
  github: ''
  linkedin: ''
  location: ''
"#;
    fs::write(&config_path, config_content)?;

    let sample_post = r#"---
title: Hello World
date: 2024-01-01
categories:
  - General
---

Welcome to your new site.

## Getting started

Run `folio-rs generate` to build the site into the public directory.
"#;
    fs::write(target_dir.join("content/blog/hello-world.md"), sample_post)?;

    let contact_page = r#"---
title: Contact
layout: contact
---

Get in touch.
"#;
    fs::write(target_dir.join("content/contact.md"), contact_page)?;

    Ok(())
}
