use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::model::RoadmapDoc;
use crate::store::{KvStore, STAGED_DOC_KEY};

/// Reads and parses a roadmap definition. Returns the document and its
/// effective roadmap id (the document's own `id`, or the file name when the
/// document has none). A read or parse failure is a load failure: the caller
/// reports it and renders nothing partial.
pub fn load_doc(path: &Path) -> Result<(RoadmapDoc, String)> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("reading roadmap definition from stdin")?;
        return parse_doc(&raw, "default");
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading roadmap definition {}", path.display()))?;
    let fallback = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("default");
    parse_doc(&raw, fallback)
}

pub fn parse_doc(raw: &str, fallback_id: &str) -> Result<(RoadmapDoc, String)> {
    let doc: RoadmapDoc =
        serde_json::from_str(raw).context("roadmap definition is not valid JSON")?;
    let id = doc
        .id
        .clone()
        .unwrap_or_else(|| fallback_id.to_string());
    Ok((doc, id))
}

/// Stages a definition in the scratch slot for later `--local` runs. The
/// document is validated before it is written so a bad stage fails loudly
/// instead of poisoning the slot.
pub fn stage_doc(kv: &mut dyn KvStore, raw: &str) -> Result<()> {
    serde_json::from_str::<RoadmapDoc>(raw).context("refusing to stage: not a valid roadmap")?;
    kv.set(STAGED_DOC_KEY, raw)
}

/// Loads the staged definition. An absent or corrupt slot is a load failure,
/// not an empty roadmap.
pub fn load_staged(kv: &dyn KvStore) -> Result<(RoadmapDoc, String)> {
    let raw = kv
        .get(STAGED_DOC_KEY)
        .ok_or_else(|| anyhow!("no staged roadmap found; stage one with --stage <file>"))?;
    parse_doc(&raw, "local_map")
}
