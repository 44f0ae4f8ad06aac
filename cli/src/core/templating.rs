//! # MedAssist Template System
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Thin helpers around the Tera templating engine. MedAssist renders one
//! kind of document, the plain-text analysis report, but the helpers are
//! generic over the context type so that any `Serialize` value can feed a
//! template.
//!
//! - `load_template`: returns a user-supplied template file, or the built-in
//!   template text when none is configured
//! - `render_str`: renders template text against a serializable context
//! - `write_rendered`: writes rendered output, creating parent directories
//!
//! Autoescaping is off: the output is plain text, not HTML.
//!
//! ## Examples
//!
//! ```rust
//! let template = templating::load_template(config.report.template.as_deref(), BUILTIN)?;
//! let text = templating::render_str("report", &template, &report_context)?;
//! templating::write_rendered(&target_path, &text)?;
//! ```
//!
use crate::core::error::{MedassistError, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::{debug, info};

/// Returns the template at `custom` if set, otherwise `builtin`.
pub fn load_template(custom: Option<&str>, builtin: &'static str) -> Result<Cow<'static, str>> {
    match custom {
        Some(path) => {
            debug!("Loading custom template from '{}'", path);
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template file '{}'", path))?;
            Ok(Cow::Owned(content))
        }
        None => Ok(Cow::Borrowed(builtin)),
    }
}

/// Renders `template` with the fields of `context`.
///
/// `name` only appears in error messages.
pub fn render_str<C: Serialize>(name: &str, template: &str, context: &C) -> Result<String> {
    let tera_context = tera::Context::from_serialize(context).map_err(|e| {
        anyhow!(MedassistError::Template { source: e })
            .context(format!("Failed to build template context for '{}'", name))
    })?;
    Tera::one_off(template, &tera_context, false).map_err(|e| {
        anyhow!(MedassistError::Template { source: e })
            .context(format!("Tera rendering failed for template '{}'", name))
    })
}

/// Writes `content` to `path`, creating missing parent directories.
/// Overwrites an existing file.
pub fn write_rendered(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create directory '{}'", parent.display())
        })?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write rendered file '{}'", path.display()))?;
    info!("Wrote rendered output to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Greeting<'a> {
        name: &'a str,
        items: Vec<&'a str>,
    }

    #[test]
    fn test_render_struct_context() -> Result<()> {
        let context = Greeting {
            name: "Ada",
            items: vec!["tea", "soup"],
        };
        let rendered = render_str(
            "greeting",
            "Hi {{ name | upper }}:{% for i in items %} {{ i }}{% endfor %}",
            &context,
        )?;
        assert_eq!(rendered, "Hi ADA: tea soup");
        Ok(())
    }

    #[test]
    fn test_render_does_not_escape() -> Result<()> {
        let mut context = HashMap::new();
        context.insert("text", "fever > 103°F & chills");
        let rendered = render_str("plain", "{{ text }}", &context)?;
        assert_eq!(rendered, "fever > 103°F & chills");
        Ok(())
    }

    #[test]
    fn test_render_invalid_template_syntax() {
        let mut context = HashMap::new();
        context.insert("name", "test");
        let result = render_str("broken.tera", "Hello {{ name", &context);
        assert!(result.is_err());
        let error_string = result.unwrap_err().to_string();
        assert!(error_string.contains("Tera rendering failed"));
        assert!(error_string.contains("broken.tera"));
    }

    #[test]
    fn test_render_rejects_non_map_context() {
        let result = render_str("scalar", "{{ x }}", &42);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_template_builtin_and_custom() -> Result<()> {
        assert_eq!(load_template(None, "built in")?, "built in");

        let dir = tempdir()?;
        let path = dir.path().join("custom.tera");
        fs::write(&path, "custom {{ x }}")?;
        let loaded = load_template(Some(path.to_str().unwrap()), "built in")?;
        assert_eq!(loaded, "custom {{ x }}");

        assert!(load_template(Some("/missing/template.tera"), "built in").is_err());
        Ok(())
    }

    #[test]
    fn test_write_rendered_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("nested/deeper/out.txt");
        write_rendered(&target, "hello")?;
        assert_eq!(fs::read_to_string(&target)?, "hello");

        write_rendered(&target, "replaced")?;
        assert_eq!(fs::read_to_string(&target)?, "replaced");
        Ok(())
    }
}
