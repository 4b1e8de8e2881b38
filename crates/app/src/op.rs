use std::error::Error;

use common::prelude::*;
use common::store::StoreError;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum OpContextError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),
}

/// Everything an operation needs: the engine over the configured medium,
/// wrapped in the retry policy.
pub struct OpContext {
    pub fs: RelayFs<RetryStore<FsStore>>,
}

impl OpContext {
    pub async fn new(config: Config) -> Result<Self, OpContextError> {
        let store = FsStore::open(&config.store_path, config.max_object_size).await?;
        let store = RetryStore::new(store, RetryPolicy::default());
        let fs = RelayFs::new(
            store,
            config.key,
            FsOptions {
                max_block_size: config.max_block_size,
                parallelism: config.parallelism,
            },
        )?;
        Ok(OpContext { fs })
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
