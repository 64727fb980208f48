use std::sync::Arc;

use dispatch_command::error::CommandError;
use dispatch_command::handler::{ErrorHandler, LoggingErrorHandler};
use dispatch_command::async_command::{AsyncCommand, AsyncWorkFn, AvailabilityFn};
use dispatch_command::CommandRegistry;

fn greeting_command(name: &str) -> Arc<AsyncCommand<String>> {
    let availability: AvailabilityFn<String> = Arc::new(|who| !who.is_empty());
    let operation = name.to_string();
    let work: AsyncWorkFn<String> = Arc::new(move |who| {
        let operation = operation.clone();
        Box::pin(async move {
            println!("{operation}: hello, {who}");
            Ok(())
        })
    });

    Arc::new(
        AsyncCommand::builder()
            .name(name.to_string())
            .availability(availability)
            .work(work)
            .error_handler(Arc::new(LoggingErrorHandler::new()) as Arc<dyn ErrorHandler>)
            .build(),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let registry = CommandRegistry::new();
    registry.register(greeting_command("greet.formal"))?;
    registry.register(greeting_command("greet.casual"))?;

    println!("registered: {:?}", registry.registered_operations());

    registry
        .dispatch("greet.formal", Box::new("Alice".to_string()))?
        .join()
        .await;

    println!(
        "can dispatch with empty name: {}",
        registry.can_dispatch("greet.casual", &String::new())?
    );

    // 未登记的操作 -> 返回 NotRegistered 错误
    if let Err(CommandError::NotRegistered { operation }) =
        registry.dispatch("greet.missing", Box::new("Bob".to_string()))
    {
        eprintln!("not registered as expected: {operation}");
    }

    Ok(())
}
