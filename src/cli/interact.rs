use std::io::{BufRead, Write};

use serde_json::Value;

use super::failure;
use crate::client::{Client, Payload, RequestDescriptor};
use crate::transport::Method;

const PROMPT: &str = "nuorder> ";

const BANNER: &str = "Welcome to the `nuorder` client interactive mode

Commands:
    get <endpoint>
    delete <endpoint>
    post <endpoint> [json]
    put <endpoint> [json]
    help
    quit

Example usage:
    get /api/schemas
    put /api/company/new/force {\"name\": \"ACME\", \"code\": \"ACME\"}

Notes:
    * Creation of OAuth tokens can't be done inside this mode. See `nuorder initiate --help`.
";

/// One line of an interactive session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Request {
        method: Method,
        endpoint: String,
        body: Option<Payload>,
    },
    Help,
    Quit,
    Blank,
}

pub fn parse_line(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb {
        "" => Ok(SessionCommand::Blank),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        _ => {
            let method: Method = verb.parse().map_err(|e| format!("{}", e))?;
            let (endpoint, body) = match rest.split_once(char::is_whitespace) {
                Some((endpoint, body)) => (endpoint, body.trim()),
                None => (rest, ""),
            };
            if endpoint.is_empty() {
                return Err(format!("usage: {} <endpoint>", verb));
            }
            let body = match (method, body) {
                (_, "") => None,
                (Method::Post | Method::Put, json) => Some(Payload::Json(
                    serde_json::from_str::<Value>(json)
                        .map_err(|e| format!("body is not valid JSON: {}", e))?,
                )),
                _ => return Err(format!("{} takes no body", method)),
            };
            Ok(SessionCommand::Request {
                method,
                endpoint: endpoint.to_string(),
                body,
            })
        }
    }
}

/// Read commands from `input` until EOF or `quit`.
///
/// Replies go to `output` as pretty JSON; prompts and errors go to
/// `diagnostics`. A failed request does not end the session.
pub fn run_session<R, W, E>(
    client: &Client,
    input: R,
    mut output: W,
    mut diagnostics: E,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    write!(diagnostics, "{}\n{}", BANNER, PROMPT)?;
    diagnostics.flush()?;
    for line in input.lines() {
        match parse_line(&line?) {
            Ok(SessionCommand::Quit) => break,
            Ok(SessionCommand::Blank) => {}
            Ok(SessionCommand::Help) => write!(diagnostics, "{}", BANNER)?,
            Ok(SessionCommand::Request {
                method,
                endpoint,
                body,
            }) => match client.signed_request(RequestDescriptor::new(method, endpoint).maybe_body(body)) {
                Ok(reply) => writeln!(output, "{}", serde_json::to_string_pretty(&reply.into_json())?)?,
                Err(e) => writeln!(diagnostics, "{}", failure(&e))?,
            },
            Err(message) => writeln!(diagnostics, "{}", failure(&message))?,
        }
        write!(diagnostics, "{}", PROMPT)?;
        diagnostics.flush()?;
    }
    Ok(())
}
