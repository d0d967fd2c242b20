use explorer_protocol::request::CapabilityRequest;
use explorer_protocol::request::HandoffExecution;
use explorer_protocol::turn::Capability;

use crate::input::PromptInput;

pub const CODE_EXAMPLES: &[&str] = &[
    "Generate the first 20 numbers of the Fibonacci sequence and plot them.",
    "Create a scatter plot with random data and add a trend line.",
    "Calculate the first 50 prime numbers and visualize their distribution.",
    "Create a DataFrame with sample sales data and calculate monthly averages.",
    "Simulate a random walk and visualize it as an animated plot.",
];

pub const IMAGE_EXAMPLES: &[&str] = &[
    "A futuristic city with flying cars and neon lights at sunset.",
    "A serene mountain landscape with a crystal clear lake reflecting the sky.",
    "An orange cat wearing a business suit in an office.",
    "A steampunk-style robot playing a violin on a Victorian street.",
    "A magical library with floating books and glowing orbs of light.",
];

pub const SEARCH_EXAMPLES: &[&str] = &[
    "What are the latest developments in AI?",
    "Who won the most recent Olympic Games?",
    "What is the current status of space exploration?",
    "What are the recent breakthroughs in renewable energy?",
    "What are the latest major global economic trends?",
];

pub const ORCHESTRATION_EXAMPLES: &[&str] = &[
    "What are the current interest rates and how would they affect my investments over the next 5 years?",
    "Compare the performance of tech stocks versus energy stocks over the past year and create a graph.",
    "What is compound interest and how much would $10,000 grow to in 10 years at the current average savings rate?",
    "What are the best retirement investment strategies given the current economic outlook?",
    "Analyze the current inflation rate and show how it impacts different asset classes.",
];

pub const FUNCTION_EXAMPLES: &[&str] = &[
    "What is the current interest rate in the US?",
    "Calculate the monthly payment for a $300,000 loan at 5.2% interest over 30 years.",
    "Compare the interest rates between the ECB and the Bank of England.",
    "What would be my monthly payment for a $50,000 car loan at 4.5% for 5 years?",
    "Get me the interest rate from the Bank of Japan and explain what negative rates mean.",
];

/// Controller state machine of a capability page. There is no terminal
/// state; the page loops for the life of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResponse,
    DisplayingResult,
    Error(String),
}

pub struct PageState {
    pub capability: Capability,
    pub examples: &'static [&'static str],
    pub selected_example: usize,
    pub input: PromptInput,
    pub use_custom: bool,
    /// Search page only: include news agencies via the premium tool.
    pub premium: bool,
    /// Orchestration page only.
    pub handoff_execution: HandoffExecution,
    pub phase: Phase,
    /// Error text collected while a submit is still in flight; resolved
    /// into `Phase::Error` when the submit finishes.
    pub pending_error: Option<String>,
    pub scroll: u16,
}

impl PageState {
    pub fn new(capability: Capability) -> Self {
        let examples = match capability {
            Capability::Code => CODE_EXAMPLES,
            Capability::Image => IMAGE_EXAMPLES,
            Capability::Search => SEARCH_EXAMPLES,
            Capability::Orchestration => ORCHESTRATION_EXAMPLES,
            Capability::Function => FUNCTION_EXAMPLES,
        };
        Self {
            capability,
            examples,
            selected_example: 0,
            input: PromptInput::new(),
            use_custom: false,
            premium: false,
            handoff_execution: HandoffExecution::default(),
            phase: Phase::Idle,
            pending_error: None,
            scroll: u16::MAX,
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self.capability {
            Capability::Code => {
                "Execute Python code in a secure provider sandbox: computation, data wrangling, plots."
            }
            Capability::Image => {
                "Generate images from text prompts; each submit produces two variations."
            }
            Capability::Search => {
                "Answer questions with up-to-date information from the web, with cited sources."
            }
            Capability::Orchestration => {
                "A finance lead agent delegates to search, calculation and plotting specialists."
            }
            Capability::Function => {
                "The agent calls locally registered functions (interest rates, loan math)."
            }
        }
    }

    pub fn current_prompt(&self) -> String {
        if self.use_custom {
            self.input.text()
        } else {
            self.examples
                .get(self.selected_example)
                .map(|s| (*s).to_string())
                .unwrap_or_default()
        }
    }

    pub fn build_request(&self) -> CapabilityRequest {
        let prompt = self.current_prompt();
        match self.capability {
            Capability::Code => CapabilityRequest::Code { prompt },
            Capability::Image => CapabilityRequest::Image { prompt },
            Capability::Search => CapabilityRequest::Search {
                prompt,
                premium: self.premium,
            },
            Capability::Orchestration => CapabilityRequest::Orchestration {
                prompt,
                handoff_execution: self.handoff_execution,
            },
            Capability::Function => CapabilityRequest::Function { prompt },
        }
    }

    pub fn next_example(&mut self) {
        if !self.examples.is_empty() {
            self.selected_example = (self.selected_example + 1) % self.examples.len();
        }
    }

    pub fn prev_example(&mut self) {
        if !self.examples.is_empty() {
            self.selected_example =
                (self.selected_example + self.examples.len() - 1) % self.examples.len();
        }
    }

    pub fn toggle_handoff_execution(&mut self) {
        self.handoff_execution = match self.handoff_execution {
            HandoffExecution::Server => HandoffExecution::Client,
            HandoffExecution::Client => HandoffExecution::Server,
        };
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }
}
