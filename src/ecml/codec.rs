//! Marshalling between live node state (pixel space) and ECML attribute trees (percent space).

use crate::ecml::model::{EcmlBlock, EcmlNode, EcmlParam, FieldIssue, value_kind};
use crate::node::attributes::{Attributes, SURFACE_KEYS};
use crate::node::state::NodeState;
use crate::session::registry::MediaResolver;
use crate::transform::coords::{percent_to_pixel, to_percent};
use serde_json::Value;

impl NodeState {
    /// Serialize the node as an ECML attribute tree.
    ///
    /// Geometry is converted to percent space. `data` and `config` are written as JSON text
    /// blocks; `event` and `param` are written only when defined. Surface-side keys are left out.
    pub fn to_ecml(&self) -> EcmlNode {
        let a = &self.attributes;
        let mut extra = a.extra.clone();
        for key in SURFACE_KEYS {
            extra.remove(key);
        }
        EcmlNode {
            id: Some(self.id().to_string()),
            geometry: to_percent(a.geometry),
            visible: a.visible,
            editable: a.editable,
            asset: a.asset.clone(),
            asset_media: a.asset_media.clone(),
            extra,
            data: self.data.as_ref().map(EcmlBlock::text),
            config: self
                .config
                .as_ref()
                .map(|c| EcmlBlock::text(&Value::Object(c.clone()))),
            legacy_events: None,
            event: self.events.clone(),
            param: self.params.as_ref().map(|params| {
                params
                    .iter()
                    .map(|(name, value)| EcmlParam {
                        name: name.clone(),
                        value: (!value.is_null()).then(|| value.clone()),
                    })
                    .collect()
            }),
        }
    }

    /// Hydrate the node from an ECML attribute tree.
    ///
    /// The tree becomes the node's attributes; its `id` is ignored since ids are fixed at
    /// construction. Undecodable `data`/`config` blocks are reported and leave the node's
    /// defaults in place. Geometry is converted to pixel space last.
    pub fn from_ecml(&mut self, tree: EcmlNode, media: &dyn MediaResolver) -> Vec<FieldIssue> {
        let EcmlNode {
            id: _,
            geometry,
            visible,
            editable,
            asset,
            asset_media,
            extra,
            data,
            config,
            legacy_events,
            event,
            param,
        } = tree;
        let mut issues = Vec::new();

        self.attributes = Attributes {
            geometry,
            visible,
            editable,
            asset,
            asset_media,
            extra,
        };

        if let Some(block) = data {
            match block.decode() {
                Ok(value) => self.data = Some(value),
                Err(e) => issues.push(FieldIssue::defaulted("data", format!("decode: {e}"))),
            }
        }
        if let Some(block) = config {
            match block.decode() {
                Ok(Value::Object(map)) => self.config = Some(map),
                Ok(other) => issues.push(FieldIssue::defaulted(
                    "config",
                    format!("expected an object, found {}", value_kind(&other)),
                )),
                Err(e) => issues.push(FieldIssue::defaulted("config", format!("decode: {e}"))),
            }
        }

        if legacy_events.is_some() {
            tracing::debug!(node = %self.id(), "dropping legacy `events` field");
        }
        if let Some(list) = event {
            self.events = Some(list);
        }
        for p in param.into_iter().flatten() {
            self.add_param(p.name, p.value.unwrap_or(Value::Null));
        }

        if let Some(asset) = self.attributes.asset.clone() {
            let resolved = self
                .attributes
                .asset_media
                .clone()
                .or_else(|| media.resolve(&asset));
            match resolved {
                Some(m) => self.add_media(m),
                None => tracing::debug!(node = %self.id(), %asset, "asset has no media descriptor"),
            }
        }

        percent_to_pixel(&mut self.attributes.geometry);

        for issue in &issues {
            tracing::warn!(node = %self.id(), %issue, "tolerated ECML issue");
        }
        issues
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ecml/codec.rs"]
mod tests;
