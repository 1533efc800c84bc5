use std::io::{BufWriter, Read, Write};
use std::*;

use huffman::archive::{self, Config};
use huffman::{canonical, Canonical, Tree};

#[derive(Debug)]
enum Error {
    /// just relaying io::Error
    Io(io::Error),

    /// there is no input from stdin
    NoStdin,

    /// input to compress is not UTF-8 text
    NotUtf8(string::FromUtf8Error),

    /// compression or decompression failed
    Huffman(huffman::Error),
}

impl From<huffman::Error> for Error {
    fn from(error: huffman::Error) -> Self {
        Error::Huffman(error)
    }
}

/// read everything from the reader as text
fn read_text<R: Read>(mut reader: R) -> Result<String, Error> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input).map_err(Error::Io)?;
    String::from_utf8(input).map_err(Error::NotUtf8)
}

/// format the canonical code of each symbol of the text
/// Each symbol-code relation is newline separated,
/// and each symbol-code relation is represented by tab separated pair of symbol and code.
fn format_codebook(text: &str) -> Result<String, huffman::Error> {
    let lengths = match Tree::from_sequence(text.chars()) {
        None => return Ok(String::new()),
        Some(tree) => canonical::lengths_of(&tree.code_table()),
    };
    let codebook = Canonical::new(&lengths)?
        .code_table()
        .iter()
        .map(|(symbol, code)| {
            format!(
                "{}\t{}",
                symbol.escape_default(),
                huffman::pack::to_bit_string(code)
            )
        })
        .collect::<Vec<String>>()
        .join("\n");
    Ok(codebook)
}

/// a single ASCII character, or one of the escapes \n, \t, \0
fn parse_separator(s: &str) -> Result<u8, String> {
    match s {
        "\\n" => Ok(b'\n'),
        "\\t" => Ok(b'\t'),
        "\\0" => Ok(0),
        _ => match s.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("{:?} is not a single ASCII character", s)),
        },
    }
}

// options
use clap::{Parser, Subcommand};

/// represent all acceptable arguments
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// byte separating the code lengths from the payload [default: \n]
    #[clap(long, global = true, parse(try_from_str = parse_separator))]
    separator: Option<u8>,

    #[clap(subcommand)]
    mode: Mode,
}
#[derive(Subcommand)]
enum Mode {
    /// compresses text
    Compress,

    /// decompresses text
    Decompress,

    /// prints the canonical code of each character
    Codebook,
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // prepare stdout with buffering
    let stdout = io::stdout();
    let mut stdout = BufWriter::new(stdout.lock());
    macro_rules! println {
        ($($arg:tt)*) => ({
            $crate::writeln!(stdout, $($arg)*).map_err(Error::Io)?;
        })
    }
    // abort when there is no input from stdin
    if atty::is(atty::Stream::Stdin) {
        println!("Huffman only accepts input from stdin.");
        return Err(Error::NoStdin);
    }

    // get arguments
    let args = Args::parse();
    let config = args
        .separator
        .map_or_else(Config::default, |separator| Config { separator });

    // run each subcommands
    match args.mode {
        Mode::Compress => {
            // get text from stdin, waits until EOF
            let input = read_text(io::stdin().lock())?;
            let compressed = archive::compress_text(&config, &input)?;
            log::info!("compressed {} bytes into {}", input.len(), compressed.len());
            stdout.write_all(&compressed).map_err(Error::Io)?;
        }
        Mode::Decompress => {
            let mut input = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut input)
                .map_err(Error::Io)?;
            let text = archive::decompress_text(&config, &input)?;
            stdout.write_all(text.as_bytes()).map_err(Error::Io)?;
        }
        Mode::Codebook => {
            let input = read_text(io::stdin().lock())?;
            // print each character and corresponding code
            println!("{}", format_codebook(&input)?);
        }
    }
    stdout.flush().map_err(Error::Io)
}
