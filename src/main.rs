use stress_test::{stress_test_racing, stress_test_scaling, stress_test_service};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,liveblog::stress_test=info")),
        )
        .init();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async_main());
}

async fn async_main() {

    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC STRESS TESTS                               ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: Serialized editors, small scale
    let stats = stress_test_service(4, 100).await;
    stats.print();

    // Test 2: Racing editors, small scale
    let stats = stress_test_racing(4, 100).await;
    stats.print();

    // Test 3: Serialized editors, medium scale
    let stats = stress_test_service(10, 500).await;
    stats.print();

    // Test 4: Racing editors, medium scale
    let stats = stress_test_racing(10, 500).await;
    stats.print();

    // Test 5: Scaling analysis
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║          SCALING ANALYSIS (Feed Service)                   ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    stress_test_scaling(20, 4).await;

    println!("\n✓ All stress tests completed successfully!");
}
