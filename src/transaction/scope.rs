use crate::context::OperationContext;
use crate::core::Result;
use crate::repository::TransactionProvider;
use log::warn;
use std::future::Future;

/// Executes `op` within a transaction scope.
///
/// If `op` returns `Ok`, the transaction is committed. If it returns `Err`, or
/// the context is cancelled while it runs, the transaction is rolled back and
/// the error is returned unchanged. A failed commit is also rolled back.
///
/// The context's timeout covers begin and `op` together.
pub async fn with_transaction<P, F, Fut, T>(
    provider: &P,
    ctx: &OperationContext,
    op: F,
) -> Result<T>
where
    P: TransactionProvider + ?Sized,
    F: FnOnce(P::Repo) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    ctx.check()?;
    let deadline = ctx.deadline();
    let repo = ctx.run_until(deadline, provider.begin()).await?;

    let op_result = ctx.run_until(deadline, op(repo.clone())).await;
    match op_result {
        Ok(value) => {
            if let Err(err) = provider.commit(&repo).await {
                if let Err(rollback_err) = provider.rollback(&repo).await {
                    warn!("Rollback after failed commit '{}' failed: {}", err, rollback_err);
                }
                return Err(err);
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = provider.rollback(&repo).await {
                warn!("Rollback after '{}' failed: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}
