use anyhow::{anyhow, Context, Result};

use crate::{Manifest, Project, Remote};

/// Parse the XML emitted by the manifest listing service (`repo manifest`).
/// Only the elements the bisection engine needs are modeled; everything else
/// is ignored, since manifest schema validation is not this tool's job.
pub fn parse_manifest(xml: &str) -> Result<Manifest> {
    let doc = roxmltree::Document::parse(xml).context("parse manifest XML")?;
    let root = doc.root_element();
    if !root.has_tag_name("manifest") {
        return Err(anyhow!("expected <manifest> root, got <{}>", root.tag_name().name()));
    }

    let mut manifest = Manifest::default();
    for node in root.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "remote" => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| anyhow!("<remote> without a name attribute"))?;
                manifest.remotes.push(Remote {
                    name: name.to_string(),
                    fetch: node.attribute("fetch").map(str::to_string),
                    review: node.attribute("review").map(str::to_string),
                });
            }
            "default" => {
                manifest.default_remote = node.attribute("remote").map(str::to_string);
                manifest.default_revision = node.attribute("revision").map(str::to_string);
            }
            "project" => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| anyhow!("<project> without a name attribute"))?;
                manifest.projects.push(Project {
                    name: name.to_string(),
                    path: node.attribute("path").map(str::to_string),
                    remote: node.attribute("remote").map(str::to_string),
                    revision: node.attribute("revision").map(str::to_string),
                });
            }
            _ => {}
        }
    }
    Ok(manifest)
}
