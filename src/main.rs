use clap::Parser;
use notes_api::cli::{
    handle_add, handle_delete, handle_get, handle_list, handle_ping, handle_serve, handle_tags,
    handle_update, Cli, Commands,
};
use notes_api::logging::{self, LogFormat};

fn main() {
    dotenvy::dotenv().ok();

    let log_format = match LogFormat::from_env() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(log_format);

    let cli = Cli::parse();
    let api_url = cli.api_url.as_str();

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args),
        Commands::Ping(args) => handle_ping(args),
        Commands::List { search, tag, json } => handle_list(api_url, search, tag, json),
        Commands::Get { id, json } => handle_get(api_url, id, json),
        Commands::Add { title, body, json } => handle_add(api_url, title, body, json),
        Commands::Update {
            id,
            title,
            body,
            json,
        } => handle_update(api_url, id, title, body, json),
        Commands::Delete { id } => handle_delete(api_url, id),
        Commands::Tags { json } => handle_tags(api_url, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
