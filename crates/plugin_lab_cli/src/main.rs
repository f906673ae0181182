//! Command-line front end for the plugin lab core.
//!
//! # Responsibility
//! - Drive the Ajax endpoints and the keyword analyzer from a shell.
//! - Print machine-readable JSON so runs can be diffed and scripted.

use clap::{Parser, Subcommand};
use log::error;
use plugin_lab_core::db::{open_db, open_db_in_memory};
use plugin_lab_core::hooks::site_name::register_site_name_filter;
use plugin_lab_core::{
    init_logging, AjaxContext, AjaxRequest, AjaxResponse, AjaxRouter, AppConfig, HookRegistry,
    KeywordAnalyzer, Post, PostService, PostStatus, PostTypeRegistry, SiteInfo,
    SqliteMetaRepository, SqlitePostRepository, AJAX_NONCE_ACTION, CALCULATE_ACTION,
    POST_COUNT_ACTION,
};
use rusqlite::Connection;
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "plugin-lab")]
#[command(about = "Arithmetic endpoint and keyword analyzer playground")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the core library is linked
    Ping,

    /// Run the calculator endpoint with a freshly issued nonce
    Calc {
        number1: String,
        /// add | subtract | multiply | divide
        operation: String,
        number2: String,

        /// Send this nonce instead of a valid one
        #[arg(long)]
        nonce: Option<String>,
    },

    /// Save a post and print its stored keyword count
    Analyze {
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        content: String,

        /// Store the post with `publish` status instead of `draft`
        #[arg(long)]
        publish: bool,
    },

    /// Run the post-count endpoint
    CountPosts {
        #[arg(long)]
        post_type: Option<String>,
    },

    /// Print a site info field after filters run
    SiteName {
        #[arg(long, default_value = "Plugin Lab")]
        name: String,

        #[arg(long, default_value = "name")]
        show: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    match command {
        Command::Ping => {
            println!("plugin_lab_core ping={}", plugin_lab_core::ping());
            println!("plugin_lab_core version={}", plugin_lab_core::core_version());
        }
        Command::Calc {
            number1,
            operation,
            number2,
            nonce,
        } => {
            let response = calculate(&config, &number1, &operation, &number2, nonce)?;
            println!("{}", response.to_json());
        }
        Command::Analyze {
            title,
            content,
            publish,
        } => {
            let conn = open_db(&config.db_path)?;
            let posts = SqlitePostRepository::new(&conn);
            let meta = SqliteMetaRepository::new(&conn);
            let analyzer =
                KeywordAnalyzer::new(&posts, &meta).with_matcher(config.keyword_matcher());
            let mut service = PostService::new(&posts);
            service.add_save_hook(&analyzer);

            let status = if publish {
                PostStatus::Publish
            } else {
                PostStatus::Draft
            };
            let post = service.create_post(&Post::entry(title, content).with_status(status))?;
            let count = analyzer.read_keyword_count(Some(post.id))?;
            println!(
                "{}",
                json!({ "post_id": post.id, "keyword": analyzer.keyword(), "count": count })
            );
        }
        Command::CountPosts { post_type } => {
            let nonces = config.nonce_manager();
            let verifier = nonces.for_action(AJAX_NONCE_ACTION);
            let mut request =
                AjaxRequest::new(POST_COUNT_ACTION, true).param("nonce", verifier.issue());
            if let Some(post_type) = post_type {
                request = request.param("post_type", post_type);
            }
            let conn = open_db(&config.db_path)?;
            let response = dispatch(&conn, &verifier, &request)?;
            println!("{}", response.to_json());
        }
        Command::SiteName { name, show } => {
            let mut hooks = HookRegistry::new();
            register_site_name_filter(&mut hooks);
            let site = SiteInfo {
                name,
                description: String::new(),
                url: String::new(),
            };
            println!("{}", site.bloginfo(&show, &hooks));
        }
    }
    Ok(())
}

/// Runs the calculator action against a throwaway in-memory store; the
/// configured database is never opened.
fn calculate(
    config: &AppConfig,
    number1: &str,
    operation: &str,
    number2: &str,
    nonce: Option<String>,
) -> Result<AjaxResponse, Box<dyn Error>> {
    let nonces = config.nonce_manager();
    let verifier = nonces.for_action(AJAX_NONCE_ACTION);
    let nonce = nonce.unwrap_or_else(|| verifier.issue());
    let request = AjaxRequest::new(CALCULATE_ACTION, false)
        .param("nonce", nonce)
        .param("number1", number1)
        .param("number2", number2)
        .param("operation", operation);
    let conn = open_db_in_memory()?;
    dispatch(&conn, &verifier, &request)
}

fn dispatch(
    conn: &Connection,
    verifier: &dyn plugin_lab_core::TokenVerifier,
    request: &AjaxRequest,
) -> Result<AjaxResponse, Box<dyn Error>> {
    let posts = SqlitePostRepository::new(conn);
    let post_types = PostTypeRegistry::default();
    let ctx = AjaxContext {
        verifier,
        posts: &posts,
        post_types: &post_types,
    };
    let mut hooks = HookRegistry::new();
    let router = AjaxRouter::with_default_actions(&mut hooks);

    Ok(router.dispatch(&ctx, request)?)
}

#[cfg(test)]
mod tests {
    use super::calculate;
    use plugin_lab_core::config::ENV_DB_PATH;
    use plugin_lab_core::AppConfig;

    #[test]
    fn calc_leaves_the_configured_database_alone() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("never_created.sqlite3");
        let db_path_text = db_path.to_str().unwrap().to_string();
        let config = AppConfig::from_lookup(|key| {
            (key == ENV_DB_PATH).then(|| db_path_text.clone())
        })
        .unwrap();

        let response = calculate(&config, "10", "add", "5", None).unwrap();
        assert!(response.success);
        assert_eq!(response.data["calculation"], "10 add 5 = 15");
        assert!(!db_path.exists());
    }

    #[test]
    fn calc_with_forged_nonce_fails_the_security_check() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let response = calculate(&config, "10", "add", "5", Some("forged".to_string())).unwrap();
        assert_eq!(response.message(), Some("Security check failed."));
    }
}
