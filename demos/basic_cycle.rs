//! Basic control-cycle example.
//!
//! Demonstrates the cyclic use of the generator: plan toward a target,
//! command the sampled setpoint, and feed the setpoint back as the next
//! cycle's current state.
//!
//! ## Key Concepts Demonstrated:
//! - Input setup with per-axis limits
//! - The update / pass_to_input cycle of a control loop
//! - Brake behavior for an out-of-envelope start state

use otg_motion::{Input, Otg, Output, Status};

fn run_to_target(mut input: Input<3>, label: &str) -> Result<(), otg_motion::Error> {
    let mut otg = Otg::<3>::new(0.001)?;
    let mut output = Output::new();

    let mut cycles = 0u32;
    loop {
        let status = otg.update(&input, &mut output)?;
        if output.new_calculation && cycles == 0 {
            println!(
                "{label}: planned in {:.1} us, duration {:.4} s",
                output.calculation_duration,
                output.trajectory.as_ref().map(|t| t.duration()).unwrap_or(0.0)
            );
        }

        // A real controller would command the setpoint here.
        output.pass_to_input(&mut input);
        cycles += 1;

        if status == Status::Finished {
            break;
        }
    }

    println!(
        "{label}: finished after {cycles} cycles at p = [{:.4}, {:.4}, {:.4}]\n",
        output.new_position[0], output.new_position[1], output.new_position[2]
    );
    Ok(())
}

fn main() -> Result<(), otg_motion::Error> {
    println!("=== Basic Control Cycle Example ===\n");

    let mut input = Input::<3>::new();
    input.max_velocity = [1.0, 2.0, 0.5];
    input.max_acceleration = [1.0, 2.0, 0.5];
    input.max_jerk = [4.0, 8.0, 2.0];
    input.target_position = [1.0, -2.0, 0.25];
    run_to_target(input.clone(), "rest-to-rest")?;

    // An over-speed start: the planner prepends a brake ramp.
    input.current_velocity = [2.5, 0.0, 0.0];
    input.target_position = [5.0, -2.0, 0.25];
    run_to_target(input, "over-speed start")?;

    Ok(())
}
