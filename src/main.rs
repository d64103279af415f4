use clap::{Parser as ClapParser, Subcommand};
use fluent_mdx::cli::{
    self, CheckOptions, CheckResult, CliError, TokensOptions, execute_check, execute_tokens,
    tokens_to_json,
};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "mdx")]
#[command(about = "mdx - Parse MDX queries and print them in canonical form")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an MDX query and print its canonical form
    Check {
        /// The MDX query (reads from stdin if not provided)
        query: Option<String>,

        /// Print the result as JSON
        #[arg(short, long)]
        json: bool,

        /// Only validate syntax, don't print the query
        #[arg(long)]
        syntax_only: bool,

        /// Maximum grammar nesting depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Print the tokens of an MDX query
    Tokens {
        /// The MDX query (reads from stdin if not provided)
        query: Option<String>,

        /// Print the tokens as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'mdx docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let (result, json) = match cli.command {
        Commands::Check {
            query,
            json,
            syntax_only,
            max_depth,
        } => (run_check(query, json, syntax_only, max_depth), json),
        Commands::Tokens { query, json } => (run_tokens(query, json), json),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            (Ok(()), false)
        }
        Commands::Doc { category } => (
            cli::get_doc_category(&category).map(|content| print!("{}", content)),
            false,
        ),
    };

    if let Err(e) = result {
        if json {
            println!("{}", e.to_json());
        } else {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}

/// The query argument, or all of stdin when it is piped.
fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(q) => Ok(q),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(
    query: Option<String>,
    json: bool,
    syntax_only: bool,
    max_depth: Option<usize>,
) -> Result<(), CliError> {
    let options = CheckOptions {
        query: read_query(query)?,
        syntax_only,
        max_depth,
    };

    let result = execute_check(&options)?;
    if json {
        println!("{}", result.to_json());
        return Ok(());
    }
    match result {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(query) => println!("{}", query),
    }
    Ok(())
}

fn run_tokens(query: Option<String>, json: bool) -> Result<(), CliError> {
    let options = TokensOptions {
        query: read_query(query)?,
    };

    let tokens = execute_tokens(&options)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens_to_json(&tokens))?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }
    Ok(())
}
