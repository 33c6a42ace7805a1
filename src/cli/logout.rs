use crate::cli::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.guard.store().is_signed_in() {
        println!("Not signed in.");
        return Ok(());
    }
    ctx.guard.sign_out()?;
    println!("Signed out.");
    Ok(())
}
