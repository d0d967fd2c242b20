//! Fixed definitions of the provider-side agents. Each interaction creates
//! its agents fresh; nothing is cached across submits.

use explorer_protocol::wire::AgentTool;
use explorer_protocol::wire::CompletionArgs;
use explorer_protocol::wire::CreateAgentRequest;
use explorer_protocol::wire::FunctionSpec;

const DEFAULT_MODEL: &str = "mistral-medium-latest";
const LEAD_MODEL: &str = "mistral-large-latest";

const FOCUSED: CompletionArgs = CompletionArgs {
    temperature: 0.3,
    top_p: 0.95,
};

const CREATIVE: CompletionArgs = CompletionArgs {
    temperature: 0.7,
    top_p: 0.95,
};

fn agent(
    model: &str,
    name: &str,
    description: &str,
    instructions: &str,
    tools: Vec<AgentTool>,
    completion_args: CompletionArgs,
) -> CreateAgentRequest {
    CreateAgentRequest {
        model: model.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        instructions: instructions.to_string(),
        tools,
        completion_args,
    }
}

pub fn code_agent() -> CreateAgentRequest {
    agent(
        DEFAULT_MODEL,
        "Code Interpreter Agent",
        "Agent used to execute code using the interpreter tool.",
        "Use the code interpreter tool when you have to run code. You're \
         excellent at data analysis, visualization, and solving computational \
         problems.",
        vec![AgentTool::CodeInterpreter],
        FOCUSED,
    )
}

pub fn image_agent() -> CreateAgentRequest {
    agent(
        DEFAULT_MODEL,
        "Image Generation Agent",
        "Agent used to generate images based on text prompts.",
        "Use the image generation tool when you have to create images. You're \
         excellent at generating detailed, high-quality images from user \
         prompts.",
        vec![AgentTool::ImageGeneration],
        CREATIVE,
    )
}

pub fn web_search_agent(premium: bool) -> CreateAgentRequest {
    let tool = if premium {
        AgentTool::WebSearchPremium
    } else {
        AgentTool::WebSearch
    };
    agent(
        DEFAULT_MODEL,
        "Web Search Agent",
        "Agent used to search information over the web.",
        "You have the ability to perform web searches to find up-to-date \
         information. Always cite your sources and provide factual, accurate \
         information.",
        vec![tool],
        FOCUSED,
    )
}

pub fn function_agent(functions: Vec<FunctionSpec>) -> CreateAgentRequest {
    let tools = functions
        .into_iter()
        .map(|function| AgentTool::Function { function })
        .collect();
    agent(
        DEFAULT_MODEL,
        "Function Call Agent",
        "Agent that can call custom functions to retrieve information.",
        "You can use custom functions to get interest rates and perform \
         financial calculations.",
        tools,
        FOCUSED,
    )
}

// The orchestration quartet: a finance lead that can delegate to the three
// specialists below. Handoff wiring happens after creation, once the agent
// ids are known.

pub fn finance_agent() -> CreateAgentRequest {
    agent(
        LEAD_MODEL,
        "Finance Agent",
        "Agent specialized in financial analysis and advice",
        "You're an expert in finance who can analyze financial data, provide \
         investment advice, and explain financial concepts. You can hand off \
         specialized tasks to other agents.",
        Vec::new(),
        FOCUSED,
    )
}

pub fn market_search_agent() -> CreateAgentRequest {
    agent(
        DEFAULT_MODEL,
        "Web Search Agent",
        "Agent used to search information over the web",
        "You search the web for the latest financial data and market \
         information.",
        vec![AgentTool::WebSearch],
        FOCUSED,
    )
}

pub fn calculator_agent() -> CreateAgentRequest {
    agent(
        DEFAULT_MODEL,
        "Calculator Agent",
        "Agent used for complex financial calculations",
        "You perform financial calculations using the code interpreter.",
        vec![AgentTool::CodeInterpreter],
        FOCUSED,
    )
}

pub fn graph_agent() -> CreateAgentRequest {
    agent(
        DEFAULT_MODEL,
        "Graph Agent",
        "Agent used to create visual representations of financial data",
        "You create graphs and visualizations of financial data.",
        vec![AgentTool::CodeInterpreter],
        FOCUSED,
    )
}
