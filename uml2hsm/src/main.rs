//! Thin CLI around the parser and the emitters.
use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::Parser;

use uml2hsm::{emit, errors::GeneratorError};

/// UML to HSM model code generator
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Reverse operation from HSM code to UML model generation
    #[arg(short, long)]
    reverse: bool,
    /// Language to translate to/from <c|c++|python|puml>
    #[arg(short, long, default_value = "c")]
    lang: String,
    /// Print the internal HSM model for debug
    #[arg(long)]
    debug: bool,
    /// Output file of the conversion
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Source file to convert from
    src: PathBuf,
}

fn run(cli: &Cli) -> Result<(), GeneratorError> {
    if cli.reverse {
        return Err(GeneratorError::ReverseUnsupported);
    }
    let emitter = emit::emitter_for(&cli.lang)?;
    log::info!("Selected language: {}", cli.lang);

    let source = fs::read_to_string(&cli.src)?;
    let models = uml2hsm::parse(&source);
    if cli.debug {
        for hsm in &models {
            println!("{}", serde_json::to_string_pretty(hsm)?);
        }
    }
    let hsm = models
        .first()
        .ok_or_else(|| GeneratorError::NoStateMachine(cli.src.display().to_string()))?;

    match &cli.output {
        Some(path) => emitter.emit(hsm, &mut fs::File::create(path)?)?,
        None => emitter.emit(hsm, &mut io::stdout().lock())?,
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOOR_PUML: &str = "@startuml door\n\
                             title Door\n\
                             [*] --> Closed\n\
                             Closed --> Open : PUSH\n\
                             Open --> Closed : PUSH\n\
                             @enduml\n";

    fn cli_for(src: &std::path::Path, output: Option<PathBuf>) -> Cli {
        Cli {
            reverse: false,
            lang: "c".to_string(),
            debug: false,
            output,
            src: src.to_path_buf(),
        }
    }

    fn write_source(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("machine.puml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn generates_c_code_into_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(&dir, DOOR_PUML);
        let out = dir.path().join("door.c");

        run(&cli_for(&src, Some(out.clone()))).unwrap();

        let generated = fs::read_to_string(&out).unwrap();
        assert!(generated.contains("//----The following belongs to Door.h----"));
        assert!(generated.contains("HSM_Tran(This, &Door_StateOpen, 0, NULL);"));
    }

    #[test]
    fn reverse_mode_is_a_stub() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(&dir, DOOR_PUML);
        let mut cli = cli_for(&src, None);
        cli.reverse = true;

        assert!(matches!(
            run(&cli),
            Err(GeneratorError::ReverseUnsupported)
        ));
    }

    #[test]
    fn unknown_language_fails_before_touching_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = cli_for(&dir.path().join("missing.puml"), None);
        cli.lang = "cobol".to_string();

        assert!(matches!(
            run(&cli),
            Err(GeneratorError::UnsupportedLanguage(lang)) if lang == "cobol"
        ));
    }

    #[test]
    fn source_without_uml_blocks_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(&dir, "just some text\n");

        assert!(matches!(
            run(&cli_for(&src, None)),
            Err(GeneratorError::NoStateMachine(_))
        ));
    }
}
