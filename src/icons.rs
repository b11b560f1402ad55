//! Icon lookup tables: emoji → Phosphor markup, and status → sidebar icon.
//!
//! Both tables are plain values. The defaults come from constructors so a
//! build (or a test) can substitute its own mapping without touching any
//! shared state.

use crate::config::FeaturesConfig;
use crate::types::Status;
use std::collections::HashMap;

/// A Phosphor icon name plus its accessible label.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiIcon {
    pub icon: String,
    pub label: String,
}

/// How substituted icons are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    /// `regular` uses the base `ph` class; anything else becomes `ph-{weight}`.
    pub weight: String,
    /// CSS `font-size`, e.g. `1.2em`.
    pub size: Option<String>,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            weight: "regular".to_string(),
            size: None,
        }
    }
}

impl IconStyle {
    pub fn from_features(features: &FeaturesConfig) -> Self {
        Self {
            weight: features.phosphor_weight.clone(),
            size: Some(features.phosphor_size.clone()).filter(|s| !s.trim().is_empty()),
        }
    }

    fn class_prefix(&self) -> String {
        if self.weight == "regular" {
            "ph".to_string()
        } else {
            format!("ph-{}", self.weight)
        }
    }
}

/// Emoji → icon substitution table.
///
/// Entries are kept longest-first so multi-codepoint sequences (`⚠️`,
/// `👨‍💻`) match before their single-codepoint prefixes (`⚠`, `👨`).
#[derive(Debug, Clone)]
pub struct EmojiTable {
    entries: Vec<(String, EmojiIcon)>,
}

impl EmojiTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, EmojiIcon)>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, EmojiIcon)> =
            entries.into_iter().map(|(e, i)| (e.into(), i)).collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        entries.dedup_by(|a, b| a.0 == b.0);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Icon markup for a single emoji, if known.
    pub fn markup_for(&self, emoji: &str, style: &IconStyle) -> Option<String> {
        self.entries
            .iter()
            .find(|(e, _)| e == emoji)
            .map(|(_, icon)| render_icon(icon, style))
    }

    /// Substitute every known emoji in an HTML fragment.
    ///
    /// Text inside tags (attribute values) and inside `<code>`/`<pre>`
    /// elements is left alone.
    pub fn replace(&self, html: &str, style: &IconStyle) -> String {
        if self.entries.is_empty() {
            return html.to_string();
        }
        let mut out = String::with_capacity(html.len());
        let mut code_depth = 0usize;
        let mut rest = html;

        while let Some(c) = rest.chars().next() {
            if c == '<' {
                let end = rest.find('>').map_or(rest.len(), |i| i + 1);
                let tag = &rest[..end];
                let lower = tag.to_ascii_lowercase();
                if lower.starts_with("<code") || lower.starts_with("<pre") {
                    code_depth += 1;
                } else if lower.starts_with("</code") || lower.starts_with("</pre") {
                    code_depth = code_depth.saturating_sub(1);
                }
                out.push_str(tag);
                rest = &rest[end..];
                continue;
            }
            if code_depth == 0
                && !c.is_ascii()
                && let Some((emoji, icon)) = self.entries.iter().find(|(e, _)| rest.starts_with(e.as_str()))
            {
                out.push_str(&render_icon(icon, style));
                rest = &rest[emoji.len()..];
                continue;
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
        out
    }
}

fn render_icon(icon: &EmojiIcon, style: &IconStyle) -> String {
    let size = style
        .size
        .as_deref()
        .map(|s| format!(r#" style="font-size: {s}""#))
        .unwrap_or_default();
    format!(
        r#"<i class="{} ph-{}" aria-label="{}"{}></i>"#,
        style.class_prefix(),
        icon.icon,
        icon.label,
        size
    )
}

fn icon(name: &str, label: &str) -> EmojiIcon {
    EmojiIcon {
        icon: name.to_string(),
        label: label.to_string(),
    }
}

impl Default for EmojiTable {
    fn default() -> Self {
        Self::new(
            [
                // Status & validation
                ("✅", icon("check-circle", "checked")),
                ("✓", icon("check", "check")),
                ("✔️", icon("check-square", "checked")),
                ("❌", icon("x-circle", "error")),
                ("❓", icon("question", "question")),
                ("❗", icon("warning", "warning")),
                ("⚠️", icon("warning-circle", "warning")),
                ("⚠", icon("warning-circle", "warning")),
                ("⛔", icon("prohibit", "prohibited")),
                ("🚫", icon("prohibit-inset", "not allowed")),
                // Development & tech
                ("💻", icon("laptop", "laptop")),
                ("🖥️", icon("desktop", "desktop")),
                ("📱", icon("device-mobile", "mobile")),
                ("⌨️", icon("keyboard", "keyboard")),
                ("💾", icon("floppy-disk", "save")),
                ("🔧", icon("wrench", "settings")),
                ("🔨", icon("hammer", "build")),
                ("⚙️", icon("gear", "settings")),
                ("🛠️", icon("gear-six", "tools")),
                ("⚡", icon("lightning", "fast")),
                ("🔌", icon("plug", "plugin")),
                ("💡", icon("lightbulb", "idea")),
                ("🐛", icon("bug", "bug")),
                ("🤖", icon("robot", "automation")),
                // Documents & files
                ("📝", icon("note-pencil", "edit")),
                ("📄", icon("file-text", "document")),
                ("📃", icon("file", "file")),
                ("📋", icon("clipboard-text", "clipboard")),
                ("📁", icon("folder", "folder")),
                ("📂", icon("folder-open", "open folder")),
                ("🗂️", icon("folders", "folders")),
                ("📚", icon("books", "documentation")),
                ("📖", icon("book-open", "reading")),
                ("📕", icon("book", "book")),
                ("📓", icon("notebook", "notebook")),
                // Design
                ("🎨", icon("palette", "design")),
                ("✏️", icon("pencil-simple", "edit")),
                ("📐", icon("ruler", "measure")),
                // Actions & navigation
                ("🚀", icon("rocket-launch", "launch")),
                ("🎯", icon("target", "goal")),
                ("🏁", icon("flag-checkered", "finish")),
                ("🚩", icon("flag", "flag")),
                ("📍", icon("push-pin", "pin")),
                ("📌", icon("push-pin", "pinned")),
                ("🔗", icon("link", "link")),
                ("🧭", icon("compass", "navigation")),
                ("🗺️", icon("map-trifold", "map")),
                // Communication
                ("📧", icon("envelope", "email")),
                ("💬", icon("chat-circle", "chat")),
                ("📢", icon("megaphone", "announce")),
                ("🔔", icon("bell", "notification")),
                // Security
                ("🔐", icon("lock-key", "secure")),
                ("🔒", icon("lock", "locked")),
                ("🔓", icon("lock-open", "unlocked")),
                ("🔑", icon("key", "key")),
                ("🛡️", icon("shield", "security")),
                // Analytics & data
                ("📊", icon("chart-bar", "chart")),
                ("📈", icon("chart-line-up", "growth")),
                ("📉", icon("chart-line-down", "decline")),
                ("🔍", icon("magnifying-glass", "search")),
                ("🔬", icon("flask", "experiment")),
                // Time
                ("⏰", icon("alarm", "alarm")),
                ("⏱️", icon("timer", "timer")),
                ("📅", icon("calendar", "calendar")),
                ("🗓️", icon("calendar", "schedule")),
                // Nature
                ("☀️", icon("sun", "sunny")),
                ("🌙", icon("moon", "night")),
                ("⭐", icon("star", "star")),
                ("🌟", icon("star-four", "sparkle")),
                ("✨", icon("sparkle", "special")),
                ("☁️", icon("cloud", "cloud")),
                ("🔥", icon("fire", "hot")),
                // People
                ("👤", icon("user", "user")),
                ("👥", icon("users", "team")),
                ("👨‍💻", icon("user-circle", "developer")),
                ("🤝", icon("handshake", "partnership")),
                ("👍", icon("thumbs-up", "approve")),
                ("👎", icon("thumbs-down", "disapprove")),
                ("🎉", icon("confetti", "party")),
                ("🏆", icon("trophy", "achievement")),
                // Objects & commerce
                ("🏠", icon("house", "home")),
                ("🏢", icon("buildings", "office")),
                ("💰", icon("money", "money")),
                ("💳", icon("credit-card", "payment")),
                ("🛒", icon("shopping-cart", "cart")),
                ("📦", icon("package", "package")),
                // Symbols
                ("➕", icon("plus", "add")),
                ("➖", icon("minus", "remove")),
                ("✖️", icon("x", "close")),
                ("♻️", icon("recycle", "recycle")),
                ("❤️", icon("heart", "love")),
                ("▶️", icon("play", "play")),
                ("⏸️", icon("pause", "pause")),
                ("🚧", icon("barricade", "under construction")),
            ],
        )
    }
}

/// Status → sidebar icon class.
#[derive(Debug, Clone)]
pub struct StatusIcons {
    icons: HashMap<Status, String>,
}

impl StatusIcons {
    pub fn new(icons: HashMap<Status, String>) -> Self {
        Self { icons }
    }

    /// Icon class for a status, falling back to the `Default` entry.
    pub fn icon_for(&self, status: Status) -> &str {
        self.icons
            .get(&status)
            .or_else(|| self.icons.get(&Status::Default))
            .map_or("ph ph-file-text", String::as_str)
    }
}

impl Default for StatusIcons {
    fn default() -> Self {
        let icons = [
            (Status::Draft, "ph ph-pencil-simple"),
            (Status::Complete, "ph ph-check-circle"),
            (Status::Warning, "ph ph-warning"),
            (Status::Error, "ph ph-x-circle"),
            (Status::Planning, "ph ph-calendar"),
            (Status::Deprecated, "ph ph-archive"),
            (Status::Guide, "ph ph-book-open"),
            (Status::Readme, "ph ph-house"),
            (Status::Troubleshoot, "ph ph-wrench"),
            (Status::Reference, "ph ph-books"),
            (Status::Default, "ph ph-file-text"),
        ]
        .into_iter()
        .map(|(s, i)| (s, i.to_string()))
        .collect();
        Self { icons }
    }
}

/// Sidebar icon for a folder: configured icon, else a generic folder.
pub fn folder_icon<'a>(folder_icons: &'a std::collections::BTreeMap<String, String>, folder: &str) -> &'a str {
    folder_icons
        .get(folder)
        .map_or("ph ph-folder", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replaces_known_emoji() {
        let table = EmojiTable::default();
        let out = table.replace("<p>Done ✅</p>", &IconStyle::default());
        assert_eq!(
            out,
            r#"<p>Done <i class="ph ph-check-circle" aria-label="checked"></i></p>"#
        );
    }

    #[test]
    fn longest_sequence_wins() {
        let table = EmojiTable::default();
        let out = table.replace("⚠️", &IconStyle::default());
        assert!(out.contains("ph-warning-circle"));
        assert!(!out.contains('\u{fe0f}'), "variation selector left behind: {out}");
    }

    #[test]
    fn zwj_sequence_matched_whole() {
        let table = EmojiTable::default();
        let out = table.replace("👨‍💻", &IconStyle::default());
        assert!(out.contains("ph-user-circle"));
        assert!(!out.contains("ph-laptop"));
    }

    #[test]
    fn weight_and_size_applied() {
        let table = EmojiTable::default();
        let style = IconStyle {
            weight: "bold".into(),
            size: Some("1.2em".into()),
        };
        let out = table.replace("🚀", &style);
        assert_eq!(
            out,
            r#"<i class="ph-bold ph-rocket-launch" aria-label="launch" style="font-size: 1.2em"></i>"#
        );
    }

    #[test]
    fn leaves_code_and_attributes_alone() {
        let table = EmojiTable::default();
        let html = r#"<img alt="✅"><pre><code>✅</code></pre><p>✅</p>"#;
        let out = table.replace(html, &IconStyle::default());
        assert!(out.starts_with(r#"<img alt="✅"><pre><code>✅</code></pre><p><i "#));
    }

    #[test]
    fn custom_table_substitutes() {
        let table = EmojiTable::new([("🦀", icon("gear", "crab"))]);
        assert_eq!(table.len(), 1);
        let out = table.replace("🦀 ✅", &IconStyle::default());
        assert!(out.contains("crab"));
        assert!(out.ends_with(" ✅"));
    }

    #[test]
    fn markup_for_lookup() {
        let table = EmojiTable::default();
        assert!(table.markup_for("📚", &IconStyle::default()).unwrap().contains("ph-books"));
        assert_eq!(table.markup_for("🦀", &IconStyle::default()), None);
    }

    #[test]
    fn status_icons_cover_every_status() {
        let icons = StatusIcons::default();
        for status in Status::ALL {
            assert!(icons.icon_for(status).starts_with("ph ph-"), "{status}");
        }
        assert_eq!(icons.icon_for(Status::Draft), "ph ph-pencil-simple");
    }

    #[test]
    fn status_icons_fall_back_to_default() {
        let icons = StatusIcons::new(HashMap::from([(Status::Default, "x".to_string())]));
        assert_eq!(icons.icon_for(Status::Guide), "x");
    }

    #[test]
    fn folder_icon_lookup() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("api".to_string(), "ph ph-plug".to_string());
        assert_eq!(folder_icon(&map, "api"), "ph ph-plug");
        assert_eq!(folder_icon(&map, "other"), "ph ph-folder");
    }
}
