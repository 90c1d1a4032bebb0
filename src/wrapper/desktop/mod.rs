//! Desktop-shell integration.
//!
//! Generates the launcher script and desktop entry inside the app directory
//! and links them into the shared, user-level shell directories:
//!
//! - `<applications>/<id>.desktop` → `<app>/<id>.desktop`
//! - `<icons>/<id>.png` → `<app>/icon.png`
//!
//! Links always point into the app directory, so removing the directory
//! orphans a link without corrupting anything it points at.

mod template;

use crate::wrapper::{
    error::{Error, Result},
    model::{AppId, AppLayout},
    settings::Settings,
    utils::fs,
};
use handlebars::Handlebars;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use template::{DESKTOP_TEMPLATE, LAUNCHER_TEMPLATE};

/// Values substituted into the launcher and desktop entry.
#[derive(Debug, Clone, Copy)]
pub struct Identity<'a> {
    pub name: &'a str,
    pub id: &'a AppId,
    pub url: &'a str,
}

/// Which shared links a deregistration removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovedLinks {
    pub descriptor: bool,
    pub icon: bool,
}

/// Writes launcher/descriptor files and manages the shared links.
pub struct DesktopIntegrator<'a> {
    settings: &'a Settings,
    handlebars: Handlebars<'static>,
}

impl<'a> DesktopIntegrator<'a> {
    pub fn new(settings: &'a Settings) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string("launcher", LAUNCHER_TEMPLATE)
            .map_err(|e| Error::Template(Box::new(e)))?;
        handlebars
            .register_template_string("desktop", DESKTOP_TEMPLATE)
            .map_err(|e| Error::Template(Box::new(e)))?;
        Ok(Self {
            settings,
            handlebars,
        })
    }

    /// Shared desktop entry link for `id`.
    pub fn descriptor_link(&self, id: &AppId) -> PathBuf {
        self.settings
            .applications_dir()
            .join(id.desktop_file_name())
    }

    /// Shared icon link for `id`.
    pub fn icon_link(&self, id: &AppId) -> PathBuf {
        self.settings.icons_dir().join(id.icon_file_name())
    }

    /// Renders `run.sh` contents.
    pub fn render_launcher(&self, layout: &AppLayout, app: Identity<'_>) -> Result<String> {
        let mut data = BTreeMap::new();
        data.insert("name", shell_escape(app.name));
        data.insert("id", shell_escape(app.id.as_str()));
        data.insert("url", shell_escape(app.url));
        data.insert("python", shell_escape(&layout.python().to_string_lossy()));
        data.insert(
            "entry_point",
            shell_escape(&layout.entry_point().to_string_lossy()),
        );
        Ok(self.handlebars.render("launcher", &data)?)
    }

    /// Renders `<id>.desktop` contents.
    pub fn render_descriptor(&self, layout: &AppLayout, app: Identity<'_>) -> Result<String> {
        let mut data = BTreeMap::new();
        data.insert("name", desktop_value(app.name));
        data.insert("exec", exec_arg(&layout.launcher()));
        data.insert("icon", desktop_value(&layout.icon().to_string_lossy()));
        data.insert("categories", desktop_value(self.settings.categories()));
        Ok(self.handlebars.render("desktop", &data)?)
    }

    /// Writes the executable launcher script.
    pub fn write_launcher(&self, layout: &AppLayout, app: Identity<'_>) -> Result<PathBuf> {
        let contents = self.render_launcher(layout, app)?;
        let path = layout.launcher();
        fs::write_file(&path, &contents)?;
        fs::set_executable(&path)?;
        log::debug!("Wrote launcher {}", path.display());
        Ok(path)
    }

    /// Writes the desktop entry into the app directory.
    pub fn write_descriptor(&self, layout: &AppLayout, app: Identity<'_>) -> Result<PathBuf> {
        let contents = self.render_descriptor(layout, app)?;
        let path = layout.descriptor(app.id);
        fs::write_file(&path, &contents)?;
        log::debug!("Wrote desktop entry {}", path.display());
        Ok(path)
    }

    /// Links the descriptor and icon into the shared directories,
    /// replacing any existing entries with the same names.
    pub fn register(&self, layout: &AppLayout, id: &AppId) -> Result<()> {
        let descriptor_link = self.descriptor_link(id);
        fs::replace_symlink(&layout.descriptor(id), &descriptor_link)?;
        let icon_link = self.icon_link(id);
        fs::replace_symlink(&layout.icon(), &icon_link)?;
        log::debug!(
            "Registered {} and {}",
            descriptor_link.display(),
            icon_link.display()
        );
        Ok(())
    }

    /// Removes both shared links if present.
    ///
    /// Both removals are attempted; the first error is returned.
    pub fn deregister(&self, id: &AppId) -> Result<RemovedLinks> {
        let descriptor = fs::remove_link(&self.descriptor_link(id));
        let icon = fs::remove_link(&self.icon_link(id));
        Ok(RemovedLinks {
            descriptor: descriptor?,
            icon: icon?,
        })
    }
}

/// Escapes a value for a double-quoted shell string.
fn shell_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Makes a value safe for a single desktop entry line.
fn desktop_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Formats a path as a single Exec argument.
///
/// Quoted only when it contains reserved characters. Quote-level escapes
/// are applied first, then the string-level backslash escape.
fn exec_arg(path: &Path) -> String {
    const RESERVED: &[char] = &[
        ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(',
        ')', '`',
    ];
    let raw = path.to_string_lossy().replace('%', "%%");
    let arg = if raw.contains(RESERVED) {
        let mut quoted = String::from("\"");
        for c in raw.chars() {
            if matches!(c, '"' | '`' | '$' | '\\') {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        quoted
    } else {
        raw
    };
    desktop_value(&arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::settings::SettingsBuilder;

    fn settings(root: &Path) -> Settings {
        SettingsBuilder::new()
            .base_dir(root.join("apps"))
            .applications_dir(root.join("share/applications"))
            .icons_dir(root.join("share/icons"))
            .template_dir(root.join("template"))
            .lock_dir(root.join("locks"))
            .build()
            .unwrap()
    }

    #[test]
    fn launcher_exports_identity_and_execs_runtime() {
        let settings = settings(Path::new("/home/u"));
        let integrator = DesktopIntegrator::new(&settings).unwrap();
        let id = AppId::from_name("Notion");
        let layout = AppLayout::new("/home/u/apps/Notion");
        let script = integrator
            .render_launcher(
                &layout,
                Identity {
                    name: "Notion",
                    id: &id,
                    url: "https://notion.so/login",
                },
            )
            .unwrap();

        assert!(script.starts_with("#!/usr/bin/env bash\nset -euo pipefail\n"));
        assert!(script.contains("export APPNERA_APP_NAME=\"Notion\"\n"));
        assert!(script.contains("export APPNERA_APP_ID=\"notion\"\n"));
        assert!(script.contains("export APPNERA_URL=\"https://notion.so/login\"\n"));
        assert!(script.contains(
            "exec \"/home/u/apps/Notion/venv/bin/python\" \"/home/u/apps/Notion/app.py\"\n"
        ));
    }

    #[test]
    fn launcher_escapes_shell_metacharacters() {
        let settings = settings(Path::new("/home/u"));
        let integrator = DesktopIntegrator::new(&settings).unwrap();
        let id = AppId::from_name("Cash $App");
        let layout = AppLayout::new("/home/u/apps/Cash $App");
        let script = integrator
            .render_launcher(
                &layout,
                Identity {
                    name: "Cash $App \"beta\"",
                    id: &id,
                    url: "https://example.com/?q=`id`",
                },
            )
            .unwrap();
        assert!(script.contains(r#"export APPNERA_APP_NAME="Cash \$App \"beta\"""#));
        assert!(script.contains(r#"export APPNERA_URL="https://example.com/?q=\`id\`""#));
    }

    #[test]
    fn descriptor_has_required_keys() {
        let settings = settings(Path::new("/home/u"));
        let integrator = DesktopIntegrator::new(&settings).unwrap();
        let id = AppId::from_name("Notion");
        let layout = AppLayout::new("/home/u/apps/Notion");
        let entry = integrator
            .render_descriptor(
                &layout,
                Identity {
                    name: "Notion",
                    id: &id,
                    url: "https://notion.so",
                },
            )
            .unwrap();
        assert_eq!(
            entry,
            "[Desktop Entry]\n\
             Name=Notion\n\
             Comment=Notion\n\
             Exec=/home/u/apps/Notion/run.sh\n\
             Icon=/home/u/apps/Notion/icon.png\n\
             Terminal=false\n\
             Type=Application\n\
             Categories=Network;WebBrowser;\n"
        );
    }

    #[test]
    fn exec_quotes_paths_with_spaces() {
        assert_eq!(
            exec_arg(Path::new("/home/u/.local/My App/run.sh")),
            "\"/home/u/.local/My App/run.sh\""
        );
        assert_eq!(exec_arg(Path::new("/a/100%/run.sh")), "/a/100%%/run.sh");
    }

    #[cfg(unix)]
    #[test]
    fn register_is_idempotent_and_deregister_tolerates_absence() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let integrator = DesktopIntegrator::new(&settings).unwrap();
        let id = AppId::from_name("Notion");
        let layout = AppLayout::new(settings.app_dir("Notion"));
        std::fs::create_dir_all(layout.dir()).unwrap();
        std::fs::write(layout.descriptor(&id), "[Desktop Entry]\n").unwrap();
        std::fs::write(layout.icon(), "png").unwrap();

        integrator.register(&layout, &id).unwrap();
        integrator.register(&layout, &id).unwrap();

        let entries: Vec<_> = std::fs::read_dir(settings.applications_dir())
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            std::fs::read_link(integrator.descriptor_link(&id)).unwrap(),
            layout.descriptor(&id)
        );
        assert_eq!(
            std::fs::read_link(integrator.icon_link(&id)).unwrap(),
            layout.icon()
        );

        let removed = integrator.deregister(&id).unwrap();
        assert_eq!(
            removed,
            RemovedLinks {
                descriptor: true,
                icon: true
            }
        );
        assert_eq!(integrator.deregister(&id).unwrap(), RemovedLinks::default());
    }
}
