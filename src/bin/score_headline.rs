//! Score ad-hoc headlines through the language filter and sentiment model

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead};

use stock_ranker::{
    analysis::{aggregate_sentiment, LanguageDetector, LanguageResult},
    build_scorer,
    models::{Config, Headline},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Headlines to score; read from stdin (one per line) when omitted
    headlines: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::WARN)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = Config::from_env()?;
    let scorer = build_scorer(&config)?;

    let texts: Vec<String> = if args.headlines.is_empty() {
        io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        args.headlines
    };

    let mut batch = Vec::with_capacity(texts.len());
    for text in texts {
        let language = match scorer.filter().detector().detect_language(&text) {
            LanguageResult::Detected(lang) => lang.code().to_string(),
            LanguageResult::Undetermined => "???".to_string(),
        };
        println!("{:>7.3}  [{}]  {}", scorer.score(&text), language, text);
        batch.push(Headline::new(text, None));
    }

    println!("average: {:.3} over {} headlines", aggregate_sentiment(&scorer, &batch), batch.len());
    Ok(())
}
