use skiff_core::{
    ContentBlock, InferenceGateway, ToolDeclaration, ToolResult, Transcript, Turn,
};
use skiff_tools::{Dispatcher, ToolRegistry};
use tracing::instrument;

use crate::config::SessionProfile;
use crate::error::{SessionError, SessionResult};
use crate::runtime::input::InputSource;
use crate::runtime::render::Renderer;

/// Where the orchestration loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next human line.
    AwaitingHumanInput,
    /// The transcript ends with a human or tool-results turn; the model
    /// speaks next.
    AwaitingModelResponse,
    /// The last model turn invoked tools and their results are pending.
    HasToolResults,
    /// Input ended. Terminal.
    Finished,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub human_turns: usize,
    pub model_turns: usize,
    pub tool_invocations: usize,
    pub tool_failures: usize,
}

/// One interactive conversation.
///
/// The session exclusively owns the [`Transcript`]. It is appended to and
/// never rewritten; the gateway only ever sees it by shared reference.
///
/// ```rust,no_run
/// use skiff::{AnsiRenderer, LineInput, Session};
/// use skiff_gateway::{AnthropicGateway, GatewayConfig};
/// use skiff_tools::{Dispatcher, InMemoryToolRegistry, ToolsConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = AnthropicGateway::new(GatewayConfig {
///     api_key: std::env::var("ANTHROPIC_API_KEY")?,
///     ..Default::default()
/// })?;
/// let dispatcher = Dispatcher::new(InMemoryToolRegistry::standard(&ToolsConfig::default()));
///
/// let mut session = Session::new(gateway, dispatcher, LineInput::stdin(), AnsiRenderer::stdout(true));
/// let summary = session.run().await?;
/// println!("{} tool calls", summary.tool_invocations);
/// # Ok(())
/// # }
/// ```
pub struct Session<G, R, I, W> {
    gateway: G,
    dispatcher: Dispatcher<R>,
    declarations: Vec<ToolDeclaration>,
    input: I,
    renderer: W,
    profile: SessionProfile,
    transcript: Transcript,
    state: LoopState,
    pending: Vec<ToolResult>,
    chain: usize,
    summary: SessionSummary,
}

impl<G, R, I, W> Session<G, R, I, W>
where
    G: InferenceGateway,
    R: ToolRegistry,
    I: InputSource,
    W: Renderer,
{
    pub fn new(gateway: G, dispatcher: Dispatcher<R>, input: I, renderer: W) -> Self {
        let declarations = dispatcher.registry().declarations();
        Self {
            gateway,
            dispatcher,
            declarations,
            input,
            renderer,
            profile: SessionProfile::default(),
            transcript: Transcript::new(),
            state: LoopState::AwaitingHumanInput,
            pending: Vec::new(),
            chain: 0,
            summary: SessionSummary::default(),
        }
    }

    pub fn with_profile(mut self, profile: SessionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn renderer(&self) -> &W {
        &self.renderer
    }

    /// Drive the loop until input ends or a fatal error occurs.
    #[instrument(skip_all, fields(model = %self.gateway.model()))]
    pub async fn run(&mut self) -> SessionResult<SessionSummary> {
        if self.profile.greeting {
            self.renderer.banner().map_err(SessionError::Output)?;
        }

        while self.state != LoopState::Finished {
            if let Err(e) = self.step().await {
                tracing::error!(error = %e, code = e.error_code(), "Session aborted");
                return Err(e);
            }
        }

        let summary = self.summary;
        tracing::info!(
            human_turns = summary.human_turns,
            model_turns = summary.model_turns,
            tool_invocations = summary.tool_invocations,
            tool_failures = summary.tool_failures,
            "Session finished"
        );
        Ok(summary)
    }

    /// Perform one transition and return the new state.
    pub async fn step(&mut self) -> SessionResult<LoopState> {
        self.state = match self.state {
            LoopState::AwaitingHumanInput => self.read_human().await?,
            LoopState::AwaitingModelResponse => self.call_model().await?,
            LoopState::HasToolResults => self.append_results()?,
            LoopState::Finished => LoopState::Finished,
        };
        Ok(self.state)
    }

    async fn read_human(&mut self) -> SessionResult<LoopState> {
        loop {
            self.renderer.prompt().map_err(SessionError::Output)?;

            let Some(line) = self.input.next_line().await? else {
                tracing::debug!("Input closed");
                return Ok(LoopState::Finished);
            };
            if line.trim().is_empty() {
                continue;
            }

            self.transcript.push(Turn::human(line));
            self.summary.human_turns += 1;
            self.chain = 0;
            return Ok(LoopState::AwaitingModelResponse);
        }
    }

    #[instrument(skip_all, fields(turns = self.transcript.len(), chain = self.chain))]
    async fn call_model(&mut self) -> SessionResult<LoopState> {
        let turn = self
            .gateway
            .infer(&self.transcript, &self.declarations)
            .await?;
        self.transcript.push(turn);
        self.summary.model_turns += 1;

        let Self {
            transcript,
            dispatcher,
            renderer,
            pending,
            summary,
            ..
        } = self;
        let Some(turn) = transcript.last() else {
            return Ok(LoopState::AwaitingHumanInput);
        };

        // Blocks are handled in arrival order so traces interleave with text
        // the way the model wrote them.
        let mut render_error = None;
        for block in turn.content() {
            match block {
                ContentBlock::Text { text } if !text.is_empty() => {
                    renderer.model_text(text).map_err(SessionError::Output)?;
                }
                ContentBlock::ToolInvocation(invocation) => {
                    let result = dispatcher.execute_traced(invocation, |invocation| {
                        if let Err(e) = renderer.tool_trace(invocation) {
                            render_error.get_or_insert(e);
                        }
                    });
                    summary.tool_invocations += 1;
                    if result.is_error {
                        summary.tool_failures += 1;
                    }
                    pending.push(result);
                }
                _ => {}
            }
        }
        if let Some(e) = render_error {
            return Err(SessionError::Output(e));
        }

        if pending.is_empty() {
            Ok(LoopState::AwaitingHumanInput)
        } else {
            Ok(LoopState::HasToolResults)
        }
    }

    fn append_results(&mut self) -> SessionResult<LoopState> {
        let results = std::mem::take(&mut self.pending);
        let count = results.len();
        if let Some(turn) = Turn::tool_results(results) {
            self.transcript.push(turn);
        }
        self.chain += 1;
        tracing::debug!(results = count, chain = self.chain, "Appended tool results");

        match self.profile.max_chain_length {
            Some(limit) if self.chain >= limit => {
                tracing::warn!(limit, "Tool chain limit reached; returning to human input");
                self.renderer
                    .warning(&format!(
                        "Stopped after {limit} consecutive tool turns. Send a message to continue."
                    ))
                    .map_err(SessionError::Output)?;
                Ok(LoopState::AwaitingHumanInput)
            }
            _ => Ok(LoopState::AwaitingModelResponse),
        }
    }
}
