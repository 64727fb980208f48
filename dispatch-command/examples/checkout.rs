use std::sync::{Arc, Mutex};

use dispatch_command::AsyncCommand;
use dispatch_command::async_command::{AsyncWorkFn, AvailabilityFn};
use dispatch_command::handler::{ErrorHandler, LoggingErrorHandler, Presenter};

// 示例呈现层：把失败消息打印到标准错误
struct StderrPresenter;

impl Presenter for StderrPresenter {
    fn present(&self, operation: &str, message: &str) {
        eprintln!("[{operation}] {message}");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cart = Arc::new(Mutex::new(vec!["guitar", "amp"]));

    let cart_in_predicate = cart.clone();
    let availability: AvailabilityFn<()> =
        Arc::new(move |_| !cart_in_predicate.lock().unwrap().is_empty());

    let cart_in_work = cart.clone();
    let work: AsyncWorkFn<()> = Arc::new(move |_| {
        let cart = cart_in_work.clone();
        Box::pin(async move {
            let emptied: Vec<_> = cart.lock().unwrap().drain(..).collect();
            println!("checked out: {emptied:?}");
            Ok(())
        })
    });

    let handler = LoggingErrorHandler::with_presenter(Arc::new(StderrPresenter));

    let command = AsyncCommand::builder()
        .name("checkout".to_string())
        .availability(availability)
        .work(work)
        .error_handler(Arc::new(handler) as Arc<dyn ErrorHandler>)
        .build();

    command.on_availability_changed(|event| {
        println!("availability changed: busy={}", event.busy());
    });

    println!("can invoke: {}", command.can_invoke(&()));

    match command.invoke_async(()) {
        Ok(invocation) => invocation.join().await,
        Err(err) => eprintln!("rejected: {err}"),
    }

    // 购物车已清空，谓词翻转
    println!("can invoke after checkout: {}", command.can_invoke(&()));
}
