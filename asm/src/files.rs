use crate::assembler::{assemble, Assembly};
use crate::error::FileError;

fn write(path: String, contents: &str) -> Result<(), FileError> {
    std::fs::write(&path, contents).map_err(|err| FileError::FileWrite(path.clone(), err))?;
    log::info!("wrote {}", path);
    Ok(())
}

/// Assemble `<stem>.txt`. Always writes `<stem>.lst` and `<stem>.sym`;
/// writes `<stem>.bin` only when there were no errors.
pub fn assemble_file(stem: &str) -> Result<Assembly, FileError> {
    let path = format!("{}.txt", stem);
    let source =
        std::fs::read_to_string(&path).map_err(|err| FileError::FileOpen(path.clone(), err))?;

    let asm = assemble(&source);

    write(format!("{}.lst", stem), &asm.listing.to_string())?;
    write(format!("{}.sym", stem), &asm.symbols.dump())?;
    if let Some(program) = asm.program() {
        write(format!("{}.bin", stem), &program.dump())?;
    }
    Ok(asm)
}
