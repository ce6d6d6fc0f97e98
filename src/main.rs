use clap::Parser;
use persona_rank::{
    AnalysisInput,
    ExpectationTable,
    IoDirs,
    PdfDirectory,
    ScoringConfig,
    error::{self, Error},
    model_manager,
    ranking,
    similarity,
    title,
};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{AnalyzeArgs, BlocksArgs, Cli, Command, ExpectationsArgs};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("PERSONA_RANK_LOG") {
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

    match cli.command {
        Command::Analyze(ref args) => cmd_analyze(&cli, args)?,
        Command::Blocks(ref args) => cmd_blocks(args)?,
        Command::Expectations(ref args) => cmd_expectations(args)?,
        Command::Completions(ref args) => args.generate(),
    }

    Ok(())
}

fn load_table(extra: Option<&std::path::Path>) -> error::Result<ExpectationTable> {
    let mut table = ExpectationTable::builtin();
    if let Some(path) = extra {
        table.prepend(ExpectationTable::load(path)?);
    }
    Ok(table)
}

fn cmd_analyze(cli: &Cli, args: &AnalyzeArgs) -> error::Result<()> {
    let dirs = IoDirs::resolve(args.input_dir.as_deref(), args.output_dir.as_deref());
    let input_path = args
        .input_file
        .clone()
        .unwrap_or_else(|| dirs.input_file());

    let input = AnalysisInput::load(&input_path)?;
    let table = load_table(args.expectations.as_deref())?;
    let config = ScoringConfig::resolve(args.scoring.as_deref())?;

    let model_id = model_manager::resolve_model_id(cli.model.as_deref());
    let mut scorer = similarity::select_scorer(model_id, !cli.no_model);
    let source = PdfDirectory::new(dirs.input());

    let report =
        ranking::analyze(&input, &table, &source, scorer.as_mut(), &config);

    if args.stdout {
        println!("{}", report.to_json()?);
    } else {
        dirs.create_output()?;
        let result_path = dirs.result_file();
        report.write(&result_path)?;
        tracing::info!(path = %result_path.display(), "processing complete");
    }

    Ok(())
}

fn cmd_blocks(args: &BlocksArgs) -> error::Result<()> {
    if !args.path.is_file() {
        return Err(Error::NotFound {
            kind: "document",
            name: args.path.display().to_string(),
        });
    }

    let blocks = PdfDirectory::extract_file(&args.path)?;
    let mut shown = 0;

    for block in &blocks {
        let title = title::extract_section_title(&block.raw_text);
        if args.titled && title.is_none() {
            continue;
        }
        shown += 1;
        println!(
            "--- page {} [{} chars] {} ---",
            block.page_number,
            block.raw_text.chars().count(),
            title.as_deref().unwrap_or("(untitled)")
        );
        println!("{}", block.raw_text);
    }

    println!("\n{shown} block(s)");
    Ok(())
}

fn cmd_expectations(args: &ExpectationsArgs) -> error::Result<()> {
    let table = load_table(args.file.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    if table.sets.is_empty() {
        println!("No expectations defined.");
        return Ok(());
    }

    for set in &table.sets {
        println!("{} / {}", set.persona, set.task);
        for entry in &set.sections {
            println!(
                "  {}\t{} (p. {})",
                entry.title, entry.document, entry.page_hint
            );
        }
    }
    Ok(())
}
