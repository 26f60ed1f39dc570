//! Single-request commands: get, post, put, delete.

use clap::{ArgGroup, Parser};

use fanfetch_common_http::{
    ApiRequest, FormBody, HttpClient, JsonBody, Method, RawResponse, RequestBuilder,
};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, ResponseOutput};

/// Send a GET request
#[derive(Debug, Parser)]
pub struct GetCommand {
    /// Absolute URL, or a path under --base-url
    pub url: String,
}

impl GetCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let response = HttpClient::new()?
            .execute(ApiRequest::get(resolve(ctx, &self.url)))
            .await?;
        show(ctx, &response)
    }
}

/// Send a POST request with a JSON or form body
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("payload").required(true).args(["data", "form"])))]
pub struct PostCommand {
    /// Absolute URL, or a path under --base-url
    pub url: String,

    /// JSON body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Form field as key=value (repeatable)
    #[arg(short, long, value_parser = parse_key_val)]
    pub form: Vec<(String, String)>,
}

impl PostCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let url = resolve(ctx, &self.url);
        let request = match &self.data {
            Some(data) => {
                let value: serde_json::Value = serde_json::from_str(data)?;
                ApiRequest::post_json(url, &JsonBody(value))?
            }
            None => ApiRequest::post_form(url, &self.form.iter().cloned().collect::<FormBody>()),
        };

        let response = HttpClient::new()?.execute(request).await?;
        show(ctx, &response)
    }
}

/// Send a PUT request
#[derive(Debug, Parser)]
pub struct PutCommand {
    /// Absolute URL, or a path under --base-url
    pub url: String,

    /// JSON body
    #[arg(short, long)]
    pub data: String,
}

impl PutCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        serde_json::from_str::<serde_json::Value>(&self.data)?;
        let request = ApiRequest::new(Method::PUT, resolve(ctx, &self.url))
            .headers(RequestBuilder::new().json_content().headers().clone())
            .body(self.data.clone());

        let response = HttpClient::new()?.execute(request).await?;
        show(ctx, &response)
    }
}

/// Send a DELETE request
#[derive(Debug, Parser)]
pub struct DeleteCommand {
    /// Absolute URL, or a path under --base-url
    pub url: String,
}

impl DeleteCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let response = HttpClient::new()?.delete(&resolve(ctx, &self.url)).await?;
        show(ctx, &response)
    }
}

fn resolve(ctx: &CommandContext, url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        ctx.url(url)
    }
}

fn show(ctx: &CommandContext, response: &RawResponse) -> Result<(), CliError> {
    print_output(ctx, &ResponseOutput::from(response))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}
