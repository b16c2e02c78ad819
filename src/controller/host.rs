//! One message round trip for a host that keeps the plugin state itself.
//!
//! The host passes in everything that must survive between messages (the
//! scene, the saved templates, and the draft) and stores what comes back.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::PluginController;
use crate::apply::ApplyOptions;
use crate::message::Outbound;
use crate::scene::MemoryNode;
use crate::style::StyleOverrides;
use crate::template::{MemoryStore, StyleTemplateItem, TemplateStore};

/// Plugin state owned by the host between messages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostState {
    pub scene: MemoryNode,
    pub templates: Vec<StyleTemplateItem>,
    pub draft: StyleOverrides,
}

/// Replies to one message and the state to keep for the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostReply {
    pub replies: Vec<Outbound>,
    #[serde(flatten)]
    pub state: HostState,
}

/// Handle one raw UI message against `state`.
pub fn handle_host_message(state: HostState, message: &str, options: ApplyOptions) -> HostReply {
    let HostState {
        scene,
        templates,
        draft,
    } = state;
    let store = MemoryStore::with_items(templates.clone());
    let mut controller = PluginController::new(scene, store.clone(), options).with_draft(draft);

    let mut replies = controller.handle_text(message);
    let templates = match store.load() {
        Ok(loaded) => loaded.items,
        Err(err) => {
            warn!(%err, "template list unreadable, keeping the previous one");
            replies.push(Outbound::failed(err.to_string()));
            templates
        }
    };
    let draft = controller.state().draft.clone();

    HostReply {
        replies,
        state: HostState {
            scene: controller.into_scene(),
            templates,
            draft,
        },
    }
}
