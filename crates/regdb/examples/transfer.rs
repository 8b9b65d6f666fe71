//! Balance transfer inside a transaction scope.
//!
//! Both updates land on the scope's dedicated session; a failure anywhere
//! rolls the whole transfer back.

use regdb::{DbClient, DbError, DbResult, MysqlConfig, qb};

async fn transfer(client: &DbClient, from: &str, to: &str, amount: i64) -> DbResult<()> {
    regdb::transaction!(client, tx, {
        let sender = qb::select("accounts")
            .columns(&["balance"])
            .eq("student_id", from)
            .fetch_one(&tx)
            .await?;
        let balance: i64 = sender.get_parsed("balance")?;
        if balance < amount {
            return Err(DbError::Execution(format!(
                "insufficient balance: {balance} < {amount}"
            )));
        }

        qb::update("accounts")
            .set("balance", balance - amount)
            .eq("student_id", from)
            .execute(&tx)
            .await?;

        let receiver = qb::select("accounts")
            .columns(&["balance"])
            .eq("student_id", to)
            .fetch_one(&tx)
            .await?;
        let receiver_balance: i64 = receiver.get_parsed("balance")?;

        qb::update("accounts")
            .set("balance", receiver_balance + amount)
            .eq("student_id", to)
            .execute(&tx)
            .await?;

        Ok(())
    })
}

#[tokio::main]
async fn main() -> DbResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let client = DbClient::new(MysqlConfig::from_env());

    match transfer(&client, "S1", "S2", 25).await {
        Ok(()) => println!("transfer committed"),
        Err(e) => println!("transfer rolled back: {e}"),
    }

    Ok(())
}
