//! Compare command implementation.

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use fanfetch_common_async::PoolConfig;
use fanfetch_core::{default_endpoints, BatchFetcher, ReqwestFetcher, Strategy, TracingLog};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, TimingOutput};

/// Which strategies to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    #[default]
    All,
    Sequential,
    Barrier,
    Queue,
}

impl StrategyChoice {
    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            Self::All => Strategy::ALL.to_vec(),
            Self::Sequential => vec![Strategy::Sequential],
            Self::Barrier => vec![Strategy::Barrier],
            Self::Queue => vec![Strategy::Queue],
        }
    }
}

/// Time the fetch strategies against the default endpoints
#[derive(Debug, Parser)]
pub struct CompareCommand {
    /// Strategy to run
    #[arg(long, value_enum, default_value = "all")]
    pub strategy: StrategyChoice,

    /// Most fetches in flight at once for the concurrent strategies
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_in_flight: Option<u32>,
}

impl CompareCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let fetcher = ReqwestFetcher::new()?;
        let pool = match self.max_in_flight {
            Some(n) => PoolConfig::bounded(n as usize),
            None => PoolConfig::unbounded(),
        };
        let batch = BatchFetcher::new(Arc::new(fetcher), Arc::new(TracingLog)).with_pool(pool);
        let endpoints = default_endpoints(&ctx.base_url);

        for strategy in self.strategy.strategies() {
            let took = batch.run_timed(strategy, &endpoints).await;
            print_output(ctx, &TimingOutput::new(strategy.operation_name(), took))?;
        }
        Ok(())
    }
}
