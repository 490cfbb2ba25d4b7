//! Gates command implementation.

use console::style;

use qarch_ir::GateLibrary;

/// Execute the gates command.
pub fn execute() {
    println!("{}", style("Supported gates:").bold());
    println!();
    println!("  {:<8} {:<7} {:<7} Aliases", "Name", "Qubits", "Params");
    for info in GateLibrary::entries() {
        println!(
            "  {:<8} {:<7} {:<7} {}",
            style(info.name).cyan(),
            info.num_qubits,
            info.num_params,
            style(info.aliases.join(", ")).dim()
        );
    }
    println!();
    println!("Unrecognized labels run as the identity and produce a warning.");
}
