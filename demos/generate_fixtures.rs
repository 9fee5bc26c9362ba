use blockkkt::fixtures::*;
use blockkkt::io::ConfigurablePrintTarget;
use blockkkt::solver::*;
use std::fs::File;

fn main() -> Result<(), FixtureError> {
    // write the standard fixture cases to the file named on the
    // command line, or to fixtures.json

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures.json".to_string());

    let settings = KKTSettingsBuilder::default()
        .verbose(true)
        .build()
        .unwrap();

    let mut generator = FixtureGenerator::new(settings);
    generator.print_to_stdout();
    let cases = generator.generate_all(&standard_cases())?;

    let mut file = File::create(&path)?;
    write_fixtures(&mut file, &cases)?;

    println!("wrote {} cases to {}", cases.len(), path);
    Ok(())
}
