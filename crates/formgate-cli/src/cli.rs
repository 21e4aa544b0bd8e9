use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formgate_core::{Config, Page, SubmitEvent};

use crate::render;

/// Field that prompts for input when it is missing or empty
const PASSWORD_FIELD: &str = "password";

/// Submit page forms over HTTP using a stored credential.
#[derive(Debug, Parser)]
#[command(name = "formgate", version)]
#[command(about = "Submit page forms over HTTP using a stored credential", long_about = None)]
pub struct Cli {
    /// Page definition listing the forms.
    #[arg(long, global = true, default_value = "page.json")]
    pub page: PathBuf,

    /// Base URL for relative form actions (overrides config).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the forms on the page.
    Forms,

    /// Submit a form by id.
    Submit {
        /// Form id.
        form_id: String,

        /// Field value as name=value; repeatable.
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Submit the login form and store the returned credential.
    Login {
        /// Field value as name=value; repeatable.
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Forget the stored credential.
    Logout,

    /// Show whether a credential is stored.
    Token,
}

/// Parse a `name=value` argument. The value may itself contain `=`.
fn parse_field(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Cli {
    pub async fn run(&self, config: &Config) -> Result<ExitCode> {
        match &self.command {
            Command::Forms => {
                let page = self.load_page()?;
                render::print_forms(&page);
                Ok(ExitCode::SUCCESS)
            }
            Command::Submit { form_id, fields } => {
                let page = self.load_page()?;
                let event = page.submit_event(form_id, fields)?;
                submit(config, &page, event).await
            }
            Command::Login { fields } => {
                let page = self.load_page()?;
                let mut event = page.submit_event(&page.login_form, fields)?;
                prompt_for_password(&mut event)?;
                submit(config, &page, event).await
            }
            Command::Logout => {
                config.credential_store()?.clear()?;
                println!("Credential cleared");
                Ok(ExitCode::SUCCESS)
            }
            Command::Token => {
                let store = config.credential_store()?;
                match store.load()? {
                    Some(_) => println!("Credential stored ({})", store.backend()),
                    None => println!("No credential stored ({})", store.backend()),
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    fn load_page(&self) -> Result<Page> {
        Page::load(&self.page)
            .with_context(|| format!("Failed to load page definition {}", self.page.display()))
    }
}

async fn submit(config: &Config, page: &Page, mut event: SubmitEvent) -> Result<ExitCode> {
    let submitter = config.build_submitter(&page.user_list_region)?;
    let outcome = submitter.handle(&mut event).await;
    render::print_outcome(&page.notification_region, &page.user_list_region, &outcome)?;
    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn prompt_for_password(event: &mut SubmitEvent) -> Result<()> {
    let missing = event
        .form
        .fields
        .iter()
        .find(|f| f.name == PASSWORD_FIELD)
        .map(|f| f.value.is_empty())
        .unwrap_or(true);
    if missing {
        let password =
            rpassword::prompt_password("Password: ").context("Failed to read password")?;
        event.form.set_field(PASSWORD_FIELD, &password);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgate_core::{Form, FormRole};

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("username=admin"),
            Ok(("username".to_string(), "admin".to_string()))
        );
        assert_eq!(
            parse_field("filter=a=b"),
            Ok(("filter".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_field("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_cli_parses_submit() {
        let cli = Cli::try_parse_from([
            "formgate",
            "--page",
            "admin.json",
            "submit",
            "form-addUser",
            "-f",
            "username=bob",
            "--field",
            "fs=/home",
        ])
        .unwrap();
        assert_eq!(cli.page, PathBuf::from("admin.json"));
        match cli.command {
            Command::Submit { form_id, fields } => {
                assert_eq!(form_id, "form-addUser");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1], ("fs".to_string(), "/home".to_string()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_defaults_page_path() {
        let cli = Cli::try_parse_from(["formgate", "forms"]).unwrap();
        assert_eq!(cli.page, PathBuf::from("page.json"));
        assert!(cli.base_url.is_none());
    }

    #[test]
    fn test_password_present_is_not_prompted() {
        let form = Form::new("post", "/login").with_field(PASSWORD_FIELD, "given");
        let mut event = SubmitEvent::new(form, FormRole::Login);
        prompt_for_password(&mut event).unwrap();
        assert_eq!(event.form.fields[0].value, "given");
    }
}
