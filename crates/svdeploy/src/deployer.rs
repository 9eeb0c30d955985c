//! The deployment procedure.

use crate::factory::{ContractFactory, ContractFactoryProvider, DeployedInstance, Deployment};
use eyre::{Result, WrapErr};
use svdeploy_common::shell;

/// The line printed before anything is sent.
pub fn start_message(contract: &str) -> String {
    format!("Deploying {contract} contract...")
}

/// The line printed once the deployment is confirmed.
pub fn deployed_message(deployment: &Deployment) -> String {
    format!("{} deployed to: {}", deployment.contract, deployment.address)
}

/// The bare name of a `Name` or `path:Name` contract id.
fn contract_name(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

/// Deploys one new instance of `contract` and waits for it to be confirmed.
///
/// Every call submits a new creation transaction. Failures are returned as is, nothing is
/// retried.
pub async fn deploy<P: ContractFactoryProvider>(provider: &P, contract: &str) -> Result<Deployment> {
    if !shell::is_json() {
        sh_println!("{}", start_message(contract_name(contract)))?;
    }

    let factory = provider
        .get_contract_factory(contract)
        .await
        .wrap_err_with(|| format!("failed to get contract factory for {contract}"))?;
    let instance =
        factory.deploy().await.wrap_err_with(|| format!("failed to deploy {contract}"))?;
    debug!(address = %instance.address(), "waiting for deployment");
    let deployment = instance
        .deployed()
        .await
        .wrap_err_with(|| format!("failed to confirm deployment of {contract}"))?;

    if shell::is_json() {
        sh_println!("{}", serde_json::to_string_pretty(&deployment)?)?;
    } else {
        sh_println!("{}", deployed_message(&deployment))?;
    }
    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, address};
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    enum FailAt {
        #[default]
        Nothing,
        Factory,
        Deploy,
        Wait,
    }

    #[derive(Debug, Default)]
    struct Calls {
        factories: AtomicUsize,
        deploys: AtomicUsize,
        waits: AtomicUsize,
    }

    #[derive(Debug, Default)]
    struct MockProvider {
        fail_at: FailAt,
        calls: Arc<Calls>,
    }

    struct MockFactory {
        name: String,
        fail_at: FailAt,
        calls: Arc<Calls>,
    }

    struct MockInstance {
        name: String,
        fail_at: FailAt,
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl ContractFactoryProvider for MockProvider {
        type Factory = MockFactory;

        async fn get_contract_factory(&self, name: &str) -> Result<MockFactory> {
            self.calls.factories.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Factory {
                eyre::bail!("network unreachable");
            }
            Ok(MockFactory { name: name.to_string(), fail_at: self.fail_at, calls: self.calls.clone() })
        }
    }

    #[async_trait]
    impl ContractFactory for MockFactory {
        type Instance = MockInstance;

        async fn deploy(self) -> Result<MockInstance> {
            self.calls.deploys.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Deploy {
                eyre::bail!("insufficient funds for gas * price + value");
            }
            Ok(MockInstance { name: self.name, fail_at: self.fail_at, calls: self.calls })
        }
    }

    #[async_trait]
    impl DeployedInstance for MockInstance {
        fn address(&self) -> Address {
            DEPLOYER.create(0)
        }

        async fn deployed(self) -> Result<Deployment> {
            self.calls.waits.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Wait {
                eyre::bail!("transaction reverted");
            }
            Ok(Deployment {
                contract: self.name,
                deployer: DEPLOYER,
                address: DEPLOYER.create(0),
                transaction_hash: B256::repeat_byte(0xab),
            })
        }
    }

    fn counts(provider: &MockProvider) -> [usize; 3] {
        [
            provider.calls.factories.load(Ordering::SeqCst),
            provider.calls.deploys.load(Ordering::SeqCst),
            provider.calls.waits.load(Ordering::SeqCst),
        ]
    }

    #[tokio::test]
    async fn deploys_and_reports_address() {
        let provider = MockProvider::default();
        let deployment = deploy(&provider, "SimpleVoting").await.unwrap();

        assert_eq!(deployment.address, address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert_eq!(
            deployed_message(&deployment),
            "SimpleVoting deployed to: 0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        assert_eq!(counts(&provider), [1, 1, 1]);
    }

    #[tokio::test]
    async fn factory_failure_stops_before_deploying() {
        let provider = MockProvider { fail_at: FailAt::Factory, ..Default::default() };
        let err = deploy(&provider, "SimpleVoting").await.unwrap_err();

        assert_eq!(err.to_string(), "failed to get contract factory for SimpleVoting");
        assert_eq!(err.root_cause().to_string(), "network unreachable");
        assert_eq!(counts(&provider), [1, 0, 0]);
    }

    #[tokio::test]
    async fn deploy_failure_is_not_retried() {
        let provider = MockProvider { fail_at: FailAt::Deploy, ..Default::default() };
        let err = deploy(&provider, "SimpleVoting").await.unwrap_err();

        assert_eq!(err.to_string(), "failed to deploy SimpleVoting");
        assert!(err.root_cause().to_string().starts_with("insufficient funds"));
        assert_eq!(counts(&provider), [1, 1, 0]);
    }

    #[tokio::test]
    async fn confirmation_failure_is_reported() {
        let provider = MockProvider { fail_at: FailAt::Wait, ..Default::default() };
        let err = deploy(&provider, "SimpleVoting").await.unwrap_err();

        assert_eq!(err.to_string(), "failed to confirm deployment of SimpleVoting");
        assert_eq!(err.root_cause().to_string(), "transaction reverted");
        assert_eq!(counts(&provider), [1, 1, 1]);
    }

    #[tokio::test]
    async fn every_call_deploys_a_new_instance() {
        let provider = MockProvider::default();
        deploy(&provider, "SimpleVoting").await.unwrap();
        deploy(&provider, "SimpleVoting").await.unwrap();
        assert_eq!(counts(&provider), [2, 2, 2]);
    }

    #[test]
    fn start_message_names_contract() {
        assert_eq!(start_message("SimpleVoting"), "Deploying SimpleVoting contract...");
    }

    #[test]
    fn qualified_ids_print_bare_name() {
        assert_eq!(contract_name("contracts/SimpleVoting.sol:SimpleVoting"), "SimpleVoting");
        assert_eq!(contract_name("SimpleVoting"), "SimpleVoting");
    }
}
