#[macro_export]
macro_rules! profile {
    ($description:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        println!("[{}]: Time elapsed: {:?}", $description, duration);
        result
    }};
}
