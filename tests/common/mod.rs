//! Shared fixtures for integration tests.

#![allow(dead_code)]

use appnera::wrapper::{AppManager, CommandOutput, ProcessRunner, Settings, SettingsBuilder};
use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
    sync::{Arc, Mutex},
    time::Duration,
};
use tempfile::TempDir;

/// Stands in for `python -m venv` and `pip install`.
///
/// The venv step writes the interpreter files so later stages see a real
/// runtime directory.
#[derive(Default)]
pub struct FakePython {
    pub fail_install: bool,
    pub calls: Mutex<Vec<String>>,
}

impl ProcessRunner for FakePython {
    fn run(&self, command: &mut Command, _timeout: Option<Duration>) -> io::Result<CommandOutput> {
        let args: Vec<_> = command.get_args().map(|a| a.to_os_string()).collect();
        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|a| a.to_string_lossy().into_owned()).collect::<Vec<_>>().join(" "));

        if args.first().is_some_and(|a| a == "-m") {
            let venv = Path::new(&args[2]);
            std::fs::create_dir_all(venv.join("bin"))?;
            std::fs::write(venv.join("bin/python"), "#!/bin/sh\n")?;
            std::fs::write(venv.join("bin/pip"), "#!/bin/sh\n")?;
            return Ok(CommandOutput::ok("created"));
        }
        if self.fail_install {
            return Ok(CommandOutput::failed(
                1,
                "ERROR: No matching distribution found for PyQtWebEngine",
            ));
        }
        Ok(CommandOutput::ok("Successfully installed PyQt5 PyQtWebEngine"))
    }
}

/// Isolated base, shared and template directories plus a valid icon.
pub struct Sandbox {
    pub tmp: TempDir,
    pub settings: Settings,
    pub icon: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("template");
        std::fs::create_dir_all(&template).unwrap();
        std::fs::write(template.join("app.py"), "import os\nprint(os.environ['APPNERA_URL'])\n")
            .unwrap();
        std::fs::write(template.join("uninstall.sh"), "#!/bin/sh\nrm -rf \"$(dirname \"$0\")\"\n")
            .unwrap();
        let icon = tmp.path().join("notion.png");
        std::fs::write(&icon, b"\x89PNG\r\n\x1a\n").unwrap();

        let settings = SettingsBuilder::new()
            .base_dir(tmp.path().join("home/.local"))
            .applications_dir(tmp.path().join("home/.local/share/applications"))
            .icons_dir(tmp.path().join("home/.local/share/icons"))
            .template_dir(template)
            .lock_dir(tmp.path().join("run"))
            .build()
            .unwrap();
        Self { tmp, settings, icon }
    }

    pub fn manager(&self, runner: FakePython) -> AppManager {
        AppManager::with_runner(self.settings.clone(), Arc::new(runner))
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }
}

/// Relative paths of every file under `dir`, sorted.
pub fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            let bytes = std::fs::read(e.path()).unwrap();
            (rel, bytes)
        })
        .collect();
    files.sort();
    files
}
