use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    kubectl_limitrange::main_with("kubectl-create-limitrange").await
}
