//! Create a new post

use anyhow::Result;
use std::fs;

use crate::helpers::slugify;
use crate::Folio;

/// Create a new post file under the blog directory
pub fn run(folio: &Folio, title: &str) -> Result<()> {
    let now = chrono::Local::now();
    let slug = slugify(title);

    let target_dir = folio.source_dir.join(&folio.config.blog_dir);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        r#"---
title: {}
date: {}
categories: []
---

"#,
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_post_with_slug_filename() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        run(&folio, "My First Post!").unwrap();

        let path = dir.path().join("content/blog/my-first-post.md");
        assert!(path.exists());
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("title: My First Post!"));
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        run(&folio, "Duplicate").unwrap();
        assert!(run(&folio, "Duplicate").is_err());
    }
}
