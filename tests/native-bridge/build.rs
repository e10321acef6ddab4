fn main() -> Result<(), retainer_build::BuildError> {
    retainer_build::Builder::new("exports.txt").generate()?;
    Ok(())
}
