//! Launcher and desktop entry templates.
//!
//! Rendered with escaping disabled; values are escaped for their target
//! syntax before being inserted.

/// `run.sh`: exports the identifying variables and hands over to the runtime.
pub const LAUNCHER_TEMPLATE: &str = r#"#!/usr/bin/env bash
set -euo pipefail

export APPNERA_APP_NAME="{{name}}"
export APPNERA_APP_ID="{{id}}"
export APPNERA_URL="{{url}}"

exec "{{python}}" "{{entry_point}}"
"#;

/// `<id>.desktop`: freedesktop.org desktop entry.
pub const DESKTOP_TEMPLATE: &str = r#"[Desktop Entry]
Name={{name}}
Comment={{name}}
Exec={{exec}}
Icon={{icon}}
Terminal=false
Type=Application
Categories={{categories}}
"#;
