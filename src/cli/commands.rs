use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default OpenAPI document probed by both subcommands.
pub const DEFAULT_SPEC_URL: &str = "https://raw.githubusercontent.com/spdustin/instructions-mcp-server/refs/heads/main/src/instructions/instructions-openapi.json";

/// Default endpoint path inspected by `schema`.
pub const DEFAULT_ENDPOINT: &str = "/api/search/single";

/// Default proxy build output probed by `probe`.
pub const DEFAULT_PROXY_EXECUTABLE: &str = "./OpenAPI-MCP-Proxy/bin/Debug/net9.0/OpenAPI-MCP-Proxy.exe";

/// Default tool name looked up in the proxy's tools/list response.
pub const DEFAULT_TOOL_NAME: &str = "postapisearchsingle";

/// Diagnostics for OpenAPI documents and MCP proxy processes
#[derive(Parser, Debug)]
#[command(
    name = "specprobe",
    about = "Diagnostics for OpenAPI documents and MCP proxy processes",
    version,
    long_about = "specprobe inspects a remote OpenAPI document's request schemas and \
                  exercises an OpenAPI-to-MCP proxy executable over its stdio JSON-RPC \
                  protocol. Both subcommands default to the instructions-mcp-server \
                  spec and the local proxy build they were written against."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Inspect an endpoint's request schema in a remote OpenAPI document",
        long_about = "Downloads a JSON OpenAPI document and prints the POST operation's \
                      summary, operation id, and request-body schema for one endpoint, \
                      including per-property type, description, and required flags.\n\n\
                      Examples:\n  \
                      specprobe schema\n  \
                      specprobe schema /api/search/single\n  \
                      specprobe schema --url https://example.com/openapi.json"
    )]
    Schema(SchemaArgs),

    #[command(
        about = "Probe an MCP proxy executable's generated tool definitions",
        long_about = "Spawns the proxy with the spec URL as its argument, performs the \
                      initialize and tools/list JSON-RPC exchanges over its stdio, and \
                      prints the description and input schema of one named tool.\n\n\
                      Examples:\n  \
                      specprobe probe\n  \
                      specprobe probe ./proxy --tool postapisearchsingle"
    )]
    Probe(ProbeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SchemaArgs {
    #[arg(
        value_name = "ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        help = "Endpoint path to inspect (POST operation)"
    )]
    pub endpoint: String,

    #[arg(
        short = 'u',
        long,
        value_name = "URL",
        default_value = DEFAULT_SPEC_URL,
        help = "URL of the OpenAPI document"
    )]
    pub url: String,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "30",
        help = "Request timeout in seconds"
    )]
    pub timeout: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct ProbeArgs {
    #[arg(
        value_name = "EXECUTABLE",
        default_value = DEFAULT_PROXY_EXECUTABLE,
        help = "Path to the proxy executable"
    )]
    pub executable: PathBuf,

    #[arg(
        short = 'u',
        long,
        value_name = "URL",
        default_value = DEFAULT_SPEC_URL,
        help = "Spec URL passed to the proxy as its command-line argument"
    )]
    pub url: String,

    #[arg(
        short = 't',
        long,
        value_name = "NAME",
        default_value = DEFAULT_TOOL_NAME,
        help = "Tool name to look up in the tools/list response"
    )]
    pub tool: String,
}
