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

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open(String),
    Close(String),
    /// Text between two tags, trimmed and never empty.
    Text(String),
}

/// Splits tagged text into open tags, close tags and the text between them.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(start) => {
                push_text(&mut tokens, &rest[..start]);
                let after = &rest[start + 1..];
                let end = after.find('>').ok_or_else(|| {
                    Error::malformed(after.lines().next().unwrap_or("").trim(), "unterminated tag")
                })?;

                let inner = after[..end].trim();
                let token = match inner.strip_prefix('/') {
                    Some(name) => Token::Close(name.trim().to_owned()),
                    None => Token::Open(inner.to_owned()),
                };
                if let Token::Open(name) | Token::Close(name) = &token {
                    if name.is_empty() || name.contains('<') {
                        return Err(Error::malformed(inner, "illegal tag name"));
                    }
                }
                tokens.push(token);
                rest = &after[end + 1..];
            }
            None => {
                push_text(&mut tokens, rest);
                rest = "";
            }
        }
    }

    Ok(tokens)
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_owned()));
    }
}

/// Forward-only reader over a token sequence.
///
/// The cursor never moves backwards: once a tag has been passed it cannot be
/// read again, so records must list their tags in the expected order.
#[derive(Debug, Clone)]
pub struct TagReader {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TagReader {
    pub fn new(tokens: Vec<Token>) -> Self {
        TagReader { tokens, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Whether `<tag>` occurs at or after the cursor.
    pub fn has_tag_ahead(&self, tag: &str) -> bool {
        self.find_open(tag).is_some()
    }

    /// Moves past the next `<tag>value</tag>` and parses `value`.
    ///
    /// When the tag is missing the cursor ends up at the end of the input.
    pub fn seek_enclosed<T>(&mut self, tag: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let open = match self.find_open(tag) {
            Some(open) => open,
            None => {
                self.cursor = self.tokens.len();
                return Err(Error::malformed(tag, "tag not found"));
            }
        };
        self.cursor = open + 1;

        let value = match self.tokens.get(self.cursor) {
            Some(Token::Text(value)) => value.clone(),
            _ => return Err(Error::malformed(tag, "missing value")),
        };
        self.cursor += 1;

        match self.tokens.get(self.cursor) {
            Some(Token::Close(name)) if name == tag => self.cursor += 1,
            _ => return Err(Error::malformed(tag, format!("expected </{}>", tag))),
        }

        value
            .parse::<T>()
            .map_err(|e| Error::malformed(tag, format!("cannot parse '{}': {}", value, e)))
    }

    fn find_open(&self, tag: &str) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.cursor)
            .find(|(_, token)| matches!(token, Token::Open(name) if name == tag))
            .map(|(i, _)| i)
    }
}

impl FromStr for TagReader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(TagReader::new(tokenize(s)?))
    }
}
