//! Pinkmon MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp) that
//! exposes the roster generator for LLM interaction.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use pinkmon_generator::mcp_interface::*;
use pinkmon_generator::{
    Action, AppState, DexLoadTask, GeneratorConfig, HttpDexSource, SeededRng,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Everything one client session mutates.
#[derive(Debug)]
struct Session {
    config: GeneratorConfig,
    state: AppState,
    rng: SeededRng,
}

impl Session {
    fn new(config: GeneratorConfig) -> Self {
        Self {
            state: AppState::new(config.options.clone()),
            rng: SeededRng::new(config.seed),
            config,
        }
    }

    async fn reload(&mut self) {
        let state = std::mem::take(&mut self.state).apply(Action::BeginLoad, &mut self.rng);
        let Some(ticket) = state.loading_ticket() else {
            self.state = state;
            return;
        };
        let source = HttpDexSource::new(
            self.config.dataset_url.clone(),
            self.config.override_url.clone(),
        );
        let task = DexLoadTask::spawn(Arc::new(source), ticket);
        self.state = match task.join().await {
            Some((ticket, result)) => {
                state.apply(Action::DexLoaded { ticket, result }, &mut self.rng)
            }
            None => state,
        };
    }

    /// Loads the dex on first use. A failed load stays failed until
    /// `reload_dex` is called.
    async fn ensure_loaded(&mut self) {
        if self.state.needs_first_load() {
            self.reload().await;
        }
    }

    fn apply(&mut self, action: Action) {
        self.state = std::mem::take(&mut self.state).apply(action, &mut self.rng);
    }
}

#[derive(Debug, Clone)]
pub struct PinkmonService {
    tool_router: ToolRouter<PinkmonService>,
    session: Arc<Mutex<Session>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetOptionRequest {
    #[schemars(
        description = "Option command, e.g. 'count 3', 'type fire', 'gen 1', 'legend mythical', 'stat spe 100', 'bst off', 'fusion on', 'shiny 128', 'preset chaos'"
    )]
    pub command: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RevealRequest {
    #[schemars(description = "Key of the hidden card to reveal")]
    pub key: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupPokemonRequest {
    #[schemars(description = "Dex id or name of the Pokemon to look up")]
    pub species_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SpriteRequest {
    #[schemars(description = "Dex id or name of the Pokemon")]
    pub species_name: String,
    #[schemars(description = "Use shiny sprite folders")]
    #[serde(default)]
    pub shiny: bool,
}

fn text(body: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(body)]))
}

#[tool_router]
impl PinkmonService {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            session: Arc::new(Mutex::new(Session::new(config))),
        }
    }

    #[tool(description = "Show whether the Pokemon dex is loaded")]
    async fn dex_status(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        text(display_dex_status(&session.state))
    }

    #[tool(description = "Fetch the Pokemon dex again, discarding any earlier load")]
    async fn reload_dex(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.reload().await;
        text(display_dex_status(&session.state))
    }

    #[tool(description = "Show the current generator options")]
    async fn get_options(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        text(display_options(&session.state.options))
    }

    #[tool(description = "Change one generator option with a short command")]
    async fn set_option(
        &self,
        Parameters(request): Parameters<SetOptionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        if request.command.trim_start().to_lowercase().starts_with("types all") {
            session.ensure_loaded().await;
        }
        match parse_option_command(&request.command, &session.state) {
            Ok(action) => {
                session.apply(action);
                text(display_options(&session.state.options))
            }
            Err(e) => Err(McpError {
                code: ErrorCode(-32602),
                message: Cow::from(e),
                data: None,
            }),
        }
    }

    #[tool(description = "List the named option presets")]
    async fn list_presets(&self) -> Result<CallToolResult, McpError> {
        text(display_presets())
    }

    #[tool(description = "Generate a new random roster with the current options")]
    async fn generate(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.ensure_loaded().await;
        if !session.state.can_generate() {
            return Err(McpError {
                code: ErrorCode(-32603),
                message: Cow::from(display_dex_status(&session.state)),
                data: None,
            });
        }
        session.apply(Action::Generate);
        text(display_results(&session.state))
    }

    #[tool(description = "Show the most recent roster")]
    async fn get_results(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        text(display_results(&session.state))
    }

    #[tool(description = "Reveal a hidden mystery card")]
    async fn reveal(
        &self,
        Parameters(request): Parameters<RevealRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.apply(Action::Reveal(request.key));
        text(display_results(&session.state))
    }

    #[tool(description = "Restore default options and clear the roster")]
    async fn reset(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.apply(Action::Reset);
        text(display_options(&session.state.options))
    }

    #[tool(description = "Look up a Pokemon species in the dex")]
    async fn lookup_pokemon(
        &self,
        Parameters(request): Parameters<LookupPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.ensure_loaded().await;
        text(handle_lookup_command(&request.species_name, &session.state))
    }

    #[tool(description = "List sprite URLs for a Pokemon in fallback order")]
    async fn sprite_candidates(
        &self,
        Parameters(request): Parameters<SpriteRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.ensure_loaded().await;
        text(handle_sprites_command(
            &request.species_name,
            request.shiny,
            &session.state,
        ))
    }
}

#[tool_handler]
impl ServerHandler for PinkmonService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = std::env::var_os("PINKMON_CONFIG").map(PathBuf::from);
    let config = GeneratorConfig::load_or_default(config_path.as_deref())?;

    info!("Pinkmon MCP Server starting");
    let service = PinkmonService::new(config);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    let quit_reason = server.waiting().await?;

    info!(?quit_reason, "Pinkmon MCP Server exiting");
    Ok(())
}
