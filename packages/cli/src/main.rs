//! `japi`: judge REST API command-line client.
//!
//! Provides two subcommands:
//!
//! - **`call`**: invoke an API function and print its JSON result.
//! - **`docs`**: print the HTML documentation page listing every function.
//!
//! The base URL and bearer token can be given as flags or through the
//! `JAPI_URL` and `JAPI_TOKEN` environment variables.

use std::process;

use clap::{Parser, Subcommand};
use judgeapi::Method;
use reqwest::blocking::{Client, RequestBuilder};

/// japi: judge REST API client
#[derive(Parser)]
#[command(name = "japi", version, about, long_about = None)]
struct Cli {
    /// URL of the API base route.
    #[arg(long, env = "JAPI_URL", default_value = "http://localhost:8080/api")]
    base_url: String,

    /// Bearer token identifying the caller. Omit to call anonymously.
    #[arg(long, env = "JAPI_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Call an API function.
    ///
    /// Arguments are passed as key=value pairs: in the query string for GET,
    /// form-encoded in the body for POST and PUT. PUT requires --key.
    ///
    /// Examples:
    ///   japi call GET problems cid=2
    ///   japi call PUT team --key 7 name=Foo
    Call {
        /// HTTP method: GET | POST | PUT
        method: String,

        /// Name of the function, e.g. `problems`.
        name: String,

        /// Arguments as key=value.
        #[arg(value_parser = parse_pair)]
        args: Vec<(String, String)>,

        /// Primary key of the resource to modify (PUT only).
        #[arg(short = 'k', long = "key", value_name = "ID")]
        primary_key: Option<String>,
    },

    /// Print the documentation page of the API.
    Docs,
}

fn main() {
    let cli = Cli::parse();
    let client = Client::new();
    let base = cli.base_url.trim_end_matches('/').to_string();

    match cli.command {
        Command::Call {
            method,
            name,
            args,
            primary_key,
        } => {
            let method: Method = method
                .to_ascii_uppercase()
                .parse()
                .unwrap_or_else(|e| fatal(&format!("{e}")));
            let url = function_url(&base, &name, method, primary_key.as_deref())
                .unwrap_or_else(|e| fatal(&e));
            let req = match method {
                Method::Get => client.get(&url).query(&args),
                Method::Post => client.post(&url).form(&args),
                Method::Put => client.put(&url).form(&args),
            };
            let (status, body) = send(authorize(req, cli.token.as_deref()));
            if status.is_success() {
                print_json(&body);
            } else {
                eprintln!("japi: {}: {}", status, error_message(&body));
                process::exit(1);
            }
        }

        Command::Docs => {
            let req = client.get(format!("{base}/"));
            let (status, body) = send(authorize(req, cli.token.as_deref()));
            if !status.is_success() {
                fatal(&format!("documentation request failed with {status}"));
            }
            print!("{body}");
        }
    }
}

/// Parse a `key=value` command-line argument. The value may contain `=`.
fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

/// URL of a function below `base`; PUT appends the primary key.
fn function_url(base: &str, name: &str, method: Method, primary_key: Option<&str>) -> Result<String, String> {
    match (method, primary_key) {
        (Method::Put, Some(pk)) => Ok(format!("{base}/{name}/{pk}")),
        (Method::Put, None) => Err("PUT requires --key <ID>".into()),
        (_, Some(_)) => Err(format!("--key is only valid for PUT, not {method}")),
        (_, None) => Ok(format!("{base}/{name}")),
    }
}

fn authorize(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(t) => req.bearer_auth(t),
        None => req,
    }
}

fn send(req: RequestBuilder) -> (reqwest::StatusCode, String) {
    let resp = req
        .send()
        .unwrap_or_else(|e| fatal(&format!("request failed: {e}")));
    let status = resp.status();
    let body = resp
        .text()
        .unwrap_or_else(|e| fatal(&format!("failed to read response: {e}")));
    (status, body)
}

/// Pretty-print a JSON body, or print it verbatim if it is not JSON.
fn print_json(body: &str) {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => match serde_json::to_string_pretty(&v) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{body}"),
        },
        Err(_) => println!("{body}"),
    }
}

/// The `error` field of an error envelope, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("japi: {}", msg);
    process::exit(2);
}
