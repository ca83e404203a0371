use crate::ux_error;
use anyhow::Result;
use clap::Subcommand;
use config::DtpSettings;
use dtp_api::{ApiError, CountApi, DtpClient};
use std::sync::Arc;
use tracing::info;

#[derive(Subcommand)]
pub enum CountCommand {
    #[command(about = "Task nodes attached to an activity")]
    Tasks {
        #[arg(help = "IRI of the activity node")]
        iri: String
    },

    #[command(about = "As-built elements pointing at an as-designed node")]
    Asbuilt {
        #[arg(help = "IRI of the as-designed node")]
        iri: String
    },

    #[command(about = "Geometric defects attached to an as-built node")]
    Defects {
        #[arg(help = "IRI of the as-built node")]
        iri: String
    }
}

pub async fn run(cmd: CountCommand, settings: Arc<DtpSettings>) -> Result<()> {
    let client = DtpClient::new(Arc::clone(&settings))?;
    let count = count(&cmd, &client).await.map_err(|e| match e {
        ApiError::Mapping(e) => ux_error::unknown_mapping(&e, settings.terms()),
        ApiError::Request(e) => ux_error::request_failed(&e)
    })?;
    println!("{count}");
    Ok(())
}

async fn count(cmd: &CountCommand, api: &dyn CountApi) -> Result<u64, ApiError> {
    let (label, count) = match cmd {
        CountCommand::Tasks { iri } => (
            "tasks",
            api.activity_count_connected_task_nodes(iri).await?
        ),
        CountCommand::Asbuilt { iri } => (
            "asbuilt",
            api.asdesigned_count_connected_asbuilt_nodes(iri).await?
        ),
        CountCommand::Defects { iri } => (
            "defects",
            api.asbuilt_count_connected_geomdefect_nodes(iri).await?
        )
    };
    info!(kind = label, count, "Count query finished");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dtp_api::{ApiResult, CountQuery};
    use errors::MappingError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        queries: Mutex<Vec<CountQuery>>
    }

    #[async_trait]
    impl CountApi for RecordingApi {
        async fn count_related(&self, query: &CountQuery) -> ApiResult<u64> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(3)
        }
    }

    #[tokio::test]
    async fn test_each_subcommand_selects_its_query() {
        let api = RecordingApi::default();
        let iri = "https://node/1".to_string();

        for cmd in [
            CountCommand::Tasks { iri: iri.clone() },
            CountCommand::Asbuilt { iri: iri.clone() },
            CountCommand::Defects { iri: iri.clone() }
        ] {
            assert_eq!(count(&cmd, &api).await.unwrap(), 3);
        }

        let queries = api.queries.lock().unwrap();
        let relations: Vec<&str> = queries.iter().map(|q| q.relation_term.as_str()).collect();
        assert_eq!(
            relations,
            ["hasTask", "intentStatusRelation", "hasGeometricDefect"]
        );
        assert!(queries.iter().all(|q| q.node_iri == iri));
    }

    struct MissingOperation;

    #[async_trait]
    impl CountApi for MissingOperation {
        async fn count_related(&self, _query: &CountQuery) -> ApiResult<u64> {
            Err(MappingError::UnknownOperation {
                operation: "count_nodes".to_string()
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let cmd = CountCommand::Tasks {
            iri: "https://node/1".to_string()
        };
        let err = count(&cmd, &MissingOperation).await.unwrap_err();
        assert!(err.is_mapping());
    }
}
