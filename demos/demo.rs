// demos/demo.rs
use wheel_mc::math_utils::Timer;
use wheel_mc::mc::wheel_engine::{run_wheel_simulation, WheelConfig, LOG_FILE};

fn main() {
    println!("Running wheel-mc Demo\n");

    // Single fully-logged path over ten years of monthly periods
    let cfg = WheelConfig {
        contract_size: 100,
        paths: 1,
        periods: 120,
        s0: 25.0,
        initial_cash: 0.0,
        min_price_factor: 0.0,
        sigma: 0.2,
        r: 0.01,
        call_strike_factor: 0.05,
        put_strike_factor: 0.05,
        calls_deadline: 7,
        write_puts_if_no_calls: true,
        save_log: true,
        seed: 0,
    };

    let mut timer = Timer::new();
    timer.start();
    let output = match run_wheel_simulation(&cfg) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };
    println!("Time: {:.0} ms\n", timer.elapsed_ms());

    println!("Missed trades: {}", output.missed_trades[0]);
    println!("Open calls: {}", output.calls_opened[0]);
    println!("Exercised calls: {}", output.calls_exercised[0]);
    println!("Open puts: {}", output.puts_opened[0]);
    println!("Exercised puts: {}", output.puts_exercised[0]);
    println!("Invested money: {:.2}", output.money_spent[0]);

    let last_period = cfg.periods - 1;
    let last_day = output.stock_prices.ncols() - 1;
    println!(
        "\nFinal position: {:.2} in cash, {} shares at {:.2}",
        output.cash[[0, last_period]],
        output.shares[[0, last_period]],
        output.stock_prices[[0, last_day]]
    );
    println!("Trade log written to {}", LOG_FILE);
}
