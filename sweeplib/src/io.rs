use std::fs::File;
use std::io::Read;
use std::ops::Deref;

/// The bytes of a trace file, either memory mapped or read into a buffer
pub enum TraceData {
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
    Buffered(Vec<u8>),
}

impl Deref for TraceData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(unix)]
            TraceData::Mapped(m) => m,
            TraceData::Buffered(b) => b,
        }
    }
}

/// Loads a trace file for the simulator
///
/// On unix systems the file is memory mapped and the OS is advised that reads
/// will be sequential, which measurably speeds up large traces. Elsewhere, or
/// if mapping fails, the file is read into memory instead.
pub fn read_trace(mut file: File) -> Result<TraceData, String> {
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        // Mapping can fail on unusual filesystems, fall through to a plain read
        if let Ok(m) = unsafe { Mmap::map(&file) } {
            m.advise(Advice::Sequential)
                .map_err(|e| format!("Failed to provide access advice to the OS, {e}"))?;
            return Ok(TraceData::Mapped(m));
        }
    }
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|e| format!("Couldn't read the trace file: {e}"))?;
    Ok(TraceData::Buffered(buf))
}
