use clap::Parser;
use docfind::{
    ContentDir,
    ContentDirCorpus,
    CorpusProvider,
    cli::{Cli, Command, ListArgs, SearchArgs},
    corpus,
    error,
    mcp,
    search,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCFIND_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let content_dir = ContentDir::resolve(cli.content_dir.as_deref());

    match cli.command {
        Command::Search(args) => cmd_search(&content_dir, &args)?,
        Command::List(args) => cmd_list(&content_dir, &args)?,
        Command::Mcp => mcp::run_mcp(content_dir)?,
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_search(content_dir: &ContentDir, args: &SearchArgs) -> error::Result<()> {
    let corpus = ContentDirCorpus::new(content_dir.root());
    let response = search::execute_search(&corpus, &args.query, &args.options());

    if args.json {
        search::format_json(&response)?;
    } else if args.files {
        search::format_files(&response, &corpus);
    } else {
        search::format_human(&response);
    }
    Ok(())
}

fn cmd_list(content_dir: &ContentDir, args: &ListArgs) -> error::Result<()> {
    let documents = ContentDirCorpus::new(content_dir.root()).load()?;
    let documents = corpus::select(documents, args.pattern.as_deref())?;

    if args.json {
        let items: Vec<serde_json::Value> = documents
            .iter()
            .map(|doc| {
                serde_json::json!({
                    "id": doc.id,
                    "title": doc.title,
                    "path": doc.path,
                    "type": doc.kind,
                    "lastModified": doc.last_modified,
                })
            })
            .collect();
        println!("{}", serde_json::to_string(&items)?);
    } else if documents.is_empty() {
        match args.pattern {
            Some(ref pattern) => println!("No documents match '{pattern}'"),
            None => println!("No documents found."),
        }
    } else {
        for doc in &documents {
            let modified = doc.last_modified.as_deref().unwrap_or("-");
            println!("{}\t{}\t{modified}", doc.path, doc.title);
        }
        println!("\n{} document(s)", documents.len());
    }

    Ok(())
}
