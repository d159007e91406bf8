//! `relay request`: send one request and print the response.

use std::time::Duration;

use anyhow::{Result, bail};
use relay_core::{RequestSession, RequestTemplate, Response};
use tracing::{debug, info};

use super::environment::resolve_environment;
use crate::cli::RequestArgs;

pub async fn run_request_command(args: &RequestArgs, quiet: bool) -> Result<()> {
    let environment = resolve_environment(&args.environment)?;
    let template = build_template(args);
    let session = RequestSession::with_timeout(Duration::from_secs(args.timeout));

    debug!(method = %template.method, url = %template.url, "sending request");

    let outcome = tokio::select! {
        outcome = session.perform_request(&template, environment.as_ref()) => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel_current_request();
            None
        }
    };

    match outcome {
        Some(Ok(response)) => {
            print_response(&response, args.include, quiet);
            Ok(())
        }
        Some(Err(error)) => bail!("{error}"),
        None => {
            info!("request cancelled");
            Ok(())
        }
    }
}

fn build_template(args: &RequestArgs) -> RequestTemplate {
    RequestTemplate::new(args.method, args.url.clone())
        .with_raw_headers(args.headers.join("\n"))
        .with_body(args.body.clone().unwrap_or_default())
        .with_auth_token(args.token.clone().unwrap_or_default())
}

fn print_response(response: &Response, include_headers: bool, quiet: bool) {
    if !quiet {
        eprintln!(
            "HTTP {} · {:.0} ms ({})",
            response.status_code,
            response.latency_millis,
            response.latency_rating()
        );
    }

    if include_headers {
        let mut headers: Vec<_> = response.headers.iter().collect();
        headers.sort();
        for (name, value) in headers {
            println!("{name}: {value}");
        }
        println!();
    }

    if response.is_text() {
        println!("{}", response.body);
    } else if !quiet {
        eprintln!(
            "[{} bytes of {} not shown]",
            response.raw_bytes.len(),
            response.content_type().unwrap_or("binary content")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EnvironmentArgs;
    use relay_core::Method;

    #[test]
    fn test_build_template_joins_header_lines() {
        let args = RequestArgs {
            url: "https://example.test".to_string(),
            method: Method::Put,
            headers: vec!["A: 1".to_string(), "B: 2".to_string()],
            body: Some("{}".to_string()),
            token: None,
            include: false,
            timeout: 15,
            environment: EnvironmentArgs::default(),
        };
        let template = build_template(&args);
        assert_eq!(template.raw_headers, "A: 1\nB: 2");
        assert_eq!(template.body, "{}");
        assert_eq!(template.auth_token, "");
        assert_eq!(template.method, Method::Put);
    }
}
