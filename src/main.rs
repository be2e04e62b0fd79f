// This file is part of the open-source port of SeetaFace engine, which originally includes three modules:
//      SeetaFace Detection, SeetaFace Alignment, and SeetaFace Identification.
//
// This file is part of the SeetaFace Detection module, containing codes implementing the face detection method described in the following paper:
//
//      Funnel-structured cascade for multi-view face detection with alignment awareness,
//      Shuzhe Wu, Meina Kan, Zhenliang He, Shiguang Shan, Xilin Chen.
//      In Neurocomputing (under review)
//
// Copyright (C) 2016, Visual Information Processing and Learning (VIPL) group,
// Institute of Computing Technology, Chinese Academy of Sciences, Beijing, China.
//
// As an open-source face recognition engine: you can redistribute SeetaFace source codes
// and/or modify it under the terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use haarlearn::config::{parse_feature_types, parse_image_size};
use haarlearn::model::{read_binary_features, read_features, BINARY_MAGIC};
use haarlearn::sampler::count_legal_configurations;
use haarlearn::{ConfigurationSampler, Error, FeatureRegistry, LearnerConfig, Result, SamplingPolicy};

#[derive(Parser, Debug)]
#[command(name = "haarlearn", about = "Haar-like feature search and selection")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count the candidates of each feature type for an integral image size
    Enumerate {
        /// Integral image size, e.g. 24x24
        #[arg(long)]
        iisize: String,

        /// Feature types to search, e.g. 2v2h3v3h4q
        #[arg(long, default_value = "2v2h3v3h4q")]
        ftypes: String,

        /// Candidate sampling: `num <count>` or `time <seconds>`
        #[arg(long, num_args = 2, value_names = ["KIND", "VALUE"])]
        csample: Option<Vec<String>>,

        /// Seed of the random candidate sampler
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print every feature stored in a text or binary model file
    Inspect { file: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let result = match args.command {
        Command::Enumerate {
            iisize,
            ftypes,
            csample,
            seed,
        } => enumerate(&iisize, &ftypes, csample.as_deref(), seed),
        Command::Inspect { file } => inspect(&file),
    };

    if let Err(error) = result {
        println!("Failed: {}", error);
        std::process::exit(1);
    }
}

fn enumerate(iisize: &str, ftypes: &str, csample: Option<&[String]>, seed: Option<u64>) -> Result<()> {
    let registry = FeatureRegistry::with_default_features();
    let (width, height) = parse_image_size(iisize)?;

    let mut config = LearnerConfig::new(width, height);
    config.set_feature_types(parse_feature_types(ftypes)?);
    if let Some(option) = csample {
        config.set_sampling_policy(SamplingPolicy::from_option(&option[0], &option[1])?);
    }
    if let Some(seed) = seed {
        config.set_seed(seed);
    }
    config.validate(&registry)?;

    info!(
        "Integral image {}x{}, sampling {:?}",
        width,
        height,
        config.sampling_policy()
    );
    let sampler = ConfigurationSampler::new(config.sampling_policy(), config.seed(), width, height)?;
    for code in config.feature_types() {
        let feature = registry.get_feature(code)?;
        let legal = count_legal_configurations(feature.as_ref(), width, height);
        match sampler.planned_count(feature.as_ref()) {
            Some(planned) => println!("{}: {} legal, {} planned", code, legal, planned),
            None => println!("{}: {} legal, bounded by time", code, legal),
        }
    }
    Ok(())
}

fn inspect(file: &Path) -> Result<()> {
    let registry = FeatureRegistry::with_default_features();
    let bytes = fs::read(file)?;

    let features = if bytes.starts_with(BINARY_MAGIC) {
        read_binary_features(&bytes, &registry)?
    } else {
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        read_features(&text, &registry)?
    };

    info!("Loaded {} features from {}", features.len(), file.display());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for feature in features.iter() {
        feature.save(&mut out, 0)?;
    }
    Ok(())
}
