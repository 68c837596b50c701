//! Configuration-driven example.
//!
//! Demonstrates loading axis limits and cycle timing from TOML and driving
//! the generator with the resulting input.

use otg_motion::{parse_config, Output, Status};

const CONFIG: &str = r#"
delta_time = 0.001

[axes.pan]
max_velocity = 2.0
max_acceleration = 4.0
max_jerk = 16.0

[axes.tilt]
max_velocity = 1.0
max_acceleration = 2.0
max_jerk = 8.0
min_velocity = -0.5
"#;

fn main() -> Result<(), otg_motion::Error> {
    println!("=== Configuration-Driven Example ===\n");

    let config = parse_config(CONFIG)?;
    println!("axes: {:?}", config.axis_names().collect::<Vec<_>>());

    let mut otg = config.to_otg::<2>()?;
    let mut input = config.to_input::<2>()?;
    input.target_position = [1.5, -0.5];

    let mut output = Output::new();
    let mut cycles = 0u32;
    while otg.update(&input, &mut output)? == Status::Working {
        output.pass_to_input(&mut input);
        cycles += 1;
    }

    println!(
        "finished after {cycles} cycles at p = [{:.4}, {:.4}]",
        output.new_position[0], output.new_position[1]
    );
    Ok(())
}
