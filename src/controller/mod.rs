//! The plugin controller.
//!
//! [`PluginController`] owns the scene, the template library, and the
//! [`AppState`]. Each inbound message runs to completion before the next one
//! is handled and produces the outbound messages for the UI.

mod draft;
mod host;

use serde::Serialize;
use tracing::{debug, info};

use crate::apply::{
    ApplyOptions, ChartReport, SceneNode, StyleReport, apply_chart, apply_styles, extract_styles,
};
use crate::error::Result;
use crate::message::{ApplyRequest, Inbound, Outbound, apply_summary};
use crate::style::{ResolvedStyles, StyleOverrides, resolve_styles};
use crate::template::{StyleTemplateItem, TemplateError, TemplateLibrary, TemplateStore};

pub use draft::edit_draft;
pub use host::{HostReply, HostState, handle_host_message};

/// UI state that outlives a single message.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The style being edited, not yet saved as a template.
    pub draft: StyleOverrides,
    pub last_apply: Option<ApplyOutcome>,
}

/// Everything one apply did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub chart: ChartReport,
    pub styles: StyleReport,
    pub resolved: ResolvedStyles,
}

pub struct PluginController<N, S> {
    scene: N,
    library: TemplateLibrary<S>,
    state: AppState,
    options: ApplyOptions,
}

impl<N: SceneNode, S: TemplateStore> PluginController<N, S> {
    pub fn new(scene: N, store: S, options: ApplyOptions) -> Self {
        PluginController {
            scene,
            library: TemplateLibrary::new(store),
            state: AppState::default(),
            options,
        }
    }

    /// Start from a draft kept by the host.
    pub fn with_draft(mut self, draft: StyleOverrides) -> Self {
        self.state.draft = draft;
        self
    }

    pub fn scene(&self) -> &N {
        &self.scene
    }

    pub fn into_scene(self) -> N {
        self.scene
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn library(&self) -> &TemplateLibrary<S> {
        &self.library
    }

    /// Parse and handle one raw message.
    pub fn handle_text(&mut self, text: &str) -> Vec<Outbound> {
        match Inbound::parse(text) {
            Ok(message) => self.handle(message),
            Err(err) => vec![Outbound::failed(format!("parse failed: {err}"))],
        }
    }

    pub fn handle(&mut self, message: Inbound) -> Vec<Outbound> {
        debug!(?message, "handling message");
        match message {
            Inbound::ApplyJson { text } => match ApplyRequest::parse(&text) {
                Ok(request) => vec![self.apply_notice(&request)],
                Err(err) => vec![Outbound::failed(format!("parse failed: {err}"))],
            },
            Inbound::Apply { payload } => vec![self.apply_notice(&payload)],
            Inbound::UpdateDraft { slot, style } => {
                edit_draft(&mut self.state.draft, slot, &style);
                vec![Outbound::ok(format!("draft updated: {slot}"))]
            }
            Inbound::SaveTemplate { name, payload } => {
                let payload = match payload {
                    Some(raw) => StyleOverrides::from_raw(&raw),
                    None => self.state.draft.clone(),
                };
                let reply = notice(self.library.save(&name, payload), "saved template");
                self.with_list(vec![reply])
            }
            Inbound::RenameTemplate { id, name } => {
                let reply = notice(self.library.rename(id, &name), "renamed template");
                self.with_list(vec![reply])
            }
            Inbound::DeleteTemplate { id } => {
                let reply = notice(self.library.delete(id), "deleted template");
                self.with_list(vec![reply])
            }
            Inbound::ListTemplates => self.with_list(Vec::new()),
        }
    }

    /// Resolve styles, then lay out and style the scene.
    ///
    /// Explicit styles come from the request, then the named template, then
    /// the draft. Snapshots are re-captured from the scene every time; host
    /// captures only fill slots the scene has nothing for. Input errors
    /// return before any node is touched.
    pub fn apply(&mut self, request: &ApplyRequest) -> Result<ApplyOutcome> {
        let layout = request.chart.layout()?;
        let chart_type = request.chart.chart_type;
        let mut explicit = request.explicit();
        if let Some(id) = request.template_id {
            explicit = explicit.or(self.library.get(id)?.payload);
        }
        let explicit = explicit.or(self.state.draft.clone());

        let live = extract_styles(&self.scene, chart_type);
        let extracted = match request.extracted() {
            Some(host) => live.or(host.clone()),
            None => live,
        };
        let resolved = resolve_styles(&explicit, &extracted, request.chart.series_count());

        let chart = apply_chart(&mut self.scene, &layout, self.options);
        let styles = apply_styles(&mut self.scene, &resolved, chart_type);
        info!(%chart_type, applied = chart.applied, skipped = chart.skipped, "apply finished");

        let outcome = ApplyOutcome {
            chart,
            styles,
            resolved,
        };
        self.state.last_apply = Some(outcome.clone());
        Ok(outcome)
    }

    fn apply_notice(&mut self, request: &ApplyRequest) -> Outbound {
        match self.apply(request) {
            Ok(outcome) => Outbound::ok(apply_summary(&outcome.chart)),
            Err(err) => Outbound::failed(err.to_string()),
        }
    }

    /// Append the current template list to `out`.
    fn with_list(&self, mut out: Vec<Outbound>) -> Vec<Outbound> {
        match self.library.list() {
            Ok(items) => out.push(Outbound::Templates { items }),
            Err(err) => out.push(Outbound::failed(err.to_string())),
        }
        out
    }
}

fn notice(result: std::result::Result<StyleTemplateItem, TemplateError>, done: &str) -> Outbound {
    match result {
        Ok(item) => Outbound::ok(format!("{done}: {}", item.name)),
        Err(err) => Outbound::failed(err.to_string()),
    }
}
