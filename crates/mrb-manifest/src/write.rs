use std::collections::HashMap;
use std::fmt::Write;

use crate::Manifest;

/// Serialize a derived manifest with every resolved project pinned to a
/// concrete revision. `pins` is keyed by effective project path; a project
/// with no pin is emitted without a revision attribute, so the sync tool
/// applies its own default for it.
pub fn pinned_xml(manifest: &Manifest, pins: &HashMap<String, String>) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<manifest>\n");
    for r in &manifest.remotes {
        let _ = write!(out, "  <remote name=\"{}\"", escape(&r.name));
        if let Some(fetch) = &r.fetch {
            let _ = write!(out, " fetch=\"{}\"", escape(fetch));
        }
        if let Some(review) = &r.review {
            let _ = write!(out, " review=\"{}\"", escape(review));
        }
        out.push_str("/>\n");
    }
    if manifest.default_remote.is_some() || manifest.default_revision.is_some() {
        out.push_str("  <default");
        if let Some(remote) = &manifest.default_remote {
            let _ = write!(out, " remote=\"{}\"", escape(remote));
        }
        if let Some(revision) = &manifest.default_revision {
            let _ = write!(out, " revision=\"{}\"", escape(revision));
        }
        out.push_str("/>\n");
    }
    for p in &manifest.projects {
        let _ = write!(out, "  <project name=\"{}\"", escape(&p.name));
        if let Some(path) = &p.path {
            let _ = write!(out, " path=\"{}\"", escape(path));
        }
        if let Some(remote) = &p.remote {
            let _ = write!(out, " remote=\"{}\"", escape(remote));
        }
        if let Some(pin) = pins.get(p.effective_path()) {
            let _ = write!(out, " revision=\"{}\"", escape(pin));
        }
        out.push_str("/>\n");
    }
    out.push_str("</manifest>\n");
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_manifest;

    #[test]
    fn pinned_projects_carry_their_revision() {
        let m = parse_manifest(
            r#"<manifest>
                 <remote name="origin" fetch="https://git.example.com/"/>
                 <default remote="origin" revision="refs/heads/main"/>
                 <project name="platform/build" path="build"/>
                 <project name="kernel"/>
               </manifest>"#,
        )
        .unwrap();
        let pins = HashMap::from([("build".to_string(), "deadbeef".to_string())]);
        let xml = pinned_xml(&m, &pins);
        assert!(xml.contains(r#"<project name="platform/build" path="build" revision="deadbeef"/>"#));
        // the unresolved project falls back to the sync tool's default
        assert!(xml.contains(r#"<project name="kernel"/>"#));
        assert!(xml.contains(r#"<remote name="origin" fetch="https://git.example.com/"/>"#));
        assert!(xml.contains(r#"<default remote="origin" revision="refs/heads/main"/>"#));
    }

    #[test]
    fn derived_manifest_round_trips_through_the_parser() {
        let m = parse_manifest(
            r#"<manifest>
                 <default remote="origin" revision="main"/>
                 <project name="a"/><project name="b"/>
               </manifest>"#,
        )
        .unwrap();
        let pins = HashMap::from([
            ("a".to_string(), "1111".to_string()),
            ("b".to_string(), "2222".to_string()),
        ]);
        let back = parse_manifest(&pinned_xml(&m, &pins)).unwrap();
        assert_eq!(back.projects[0].revision.as_deref(), Some("1111"));
        assert_eq!(back.projects[1].revision.as_deref(), Some("2222"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(escape("a&b<c>\"d\""), "a&amp;b&lt;c&gt;&quot;d&quot;");
    }
}
