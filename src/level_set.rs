// level_set.rs - level set loader of sokoban
//
// sokoban-levels - Sokoban level store and loader
// Copyright (C) 2022  Mateusz Szpakowski
//
// This library is free software; you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation; either
// version 2.1 of the License, or (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this library; if not, write to the Free Software
// Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA  02110-1301  USA

use std::io;
use std::io::{BufRead,BufReader};
use std::fs::File;
use std::path::Path;
use log::{debug, info};
use quick_xml::Reader as XmlReader;
use quick_xml::events::Event as XmlEvent;
use quick_xml::events::BytesStart;

use crate::animation::Animator;
use crate::defs::*;

use crate::Level;
use LoadError::*;

/// Options of level set loading.
#[derive(PartialEq,Eq,Debug,Clone,Copy)]
pub struct LoadOptions {
    /// Required number of levels. None accepts any number.
    pub expected_levels: Option<usize>,
    /// Maximal number of characters in level row.
    pub max_width: usize,
    /// Maximal number of rows in level.
    pub max_height: usize,
}

impl Default for LoadOptions {
    fn default() -> LoadOptions {
        LoadOptions{ expected_levels: None, max_width: MAX_LEVEL_WIDTH,
                max_height: MAX_LEVEL_HEIGHT }
    }
}

impl LoadOptions {
    /// Require given number of levels.
    pub fn expect_levels(self, count: usize) -> LoadOptions {
        LoadOptions{ expected_levels: Some(count), ..self }
    }
}

// rows of the level being read, dropped after the level is built
struct Block {
    rows: Vec<Vec<char>>,
}

impl Block {
    fn new() -> Block {
        Block{ rows: vec![] }
    }

    fn push_row(&mut self, text: &str, line: usize, options: &LoadOptions)
                -> Result<(), LoadError> {
        let row: Vec<char> = text.chars().collect();
        if row.len() > options.max_width {
            return Err(LineTooLong{ line, length: row.len(), max: options.max_width });
        }
        if self.rows.len() == options.max_height {
            return Err(TooManyRows{ line, max: options.max_height });
        }
        self.rows.push(row);
        Ok(())
    }

    fn take_level<S, A>(&mut self, name: &str, animator: &mut A) -> Option<Level<S>>
            where S: Clone, A: Animator<Slide = S> {
        if self.rows.is_empty() {
            return None;
        }
        let rows = std::mem::take(&mut self.rows);
        Some(Level::from_rows(name, rows, animator))
    }
}

const BOM: &[u8] = b"\xef\xbb\xbf";

// returns number of bytes before XML declaration and whether input is XML
fn xml_prefix(head: &[u8]) -> (usize, bool) {
    let bom = if head.starts_with(BOM) { BOM.len() } else { 0 };
    let spaces = head[bom..].iter().take_while(|b| b.is_ascii_whitespace()).count();
    let skip = bom + spaces;
    (skip, head[skip..].starts_with(b"<?xml"))
}

fn level_id(e: &BytesStart, reader: &XmlReader<impl BufRead>)
            -> Result<Option<String>, LoadError> {
    for ra in e.attributes() {
        let attr = ra?;
        if attr.key == b"Id" {
            return Ok(Some(attr.unescape_and_decode_value(reader)?));
        }
    }
    Ok(None)
}

/// Level set. Contains levels in order from the input and name of the level set.
#[derive(PartialEq,Debug,Clone)]
pub struct LevelSet<S> {
    name: String,
    levels: Vec<Level<S>>,
}

impl<S> LevelSet<S> {
    /// Get name of levelset. Empty for plain text input.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Get levels.
    pub fn levels(&self) -> &[Level<S>] {
        &self.levels
    }
    /// Get levels to play them.
    pub fn levels_mut(&mut self) -> &mut [Level<S>] {
        &mut self.levels
    }
    /// Get number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }
    /// Returns true if there are no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn check_count(&self, options: &LoadOptions) -> Result<(), LoadError> {
        match options.expected_levels {
            Some(expected) if expected != self.levels.len() =>
                Err(LevelCountMismatch{ expected, found: self.levels.len() }),
            _ => Ok(()),
        }
    }
}

impl<S: Clone> LevelSet<S> {
    /// Read levelset from string.
    pub fn from_str<A>(s: &str, options: &LoadOptions, animator: &mut A)
                -> Result<LevelSet<S>, LoadError> where A: Animator<Slide = S> {
        Self::from_reader(io::Cursor::new(s.as_bytes()), options, animator)
    }
    /// Read levelset from file.
    pub fn from_file<P, A>(path: P, options: &LoadOptions, animator: &mut A)
                -> Result<LevelSet<S>, LoadError>
            where P: AsRef<Path>, A: Animator<Slide = S> {
        let f = File::open(path.as_ref())?;
        debug!("Reading levels from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(f), options, animator)
    }
    /// Read levelset from reader. Input starting with `<?xml` (after optional
    /// byte order mark and white spaces) is read as XML level collection, other
    /// input as blank line separated levels.
    pub fn from_reader<B, A>(mut reader: B, options: &LoadOptions, animator: &mut A)
                -> Result<LevelSet<S>, LoadError>
            where B: BufRead, A: Animator<Slide = S> {
        let (skip, xml) = xml_prefix(reader.fill_buf()?);
        let lset = if xml {
            reader.consume(skip);
            Self::read_from_xml(reader, options, animator)?
        } else {
            Self::read_from_text(reader, options, animator)?
        };
        info!("Loaded {} levels", lset.levels.len());
        lset.check_count(options)?;
        Ok(lset)
    }

    fn read_from_text<B, A>(mut reader: B, options: &LoadOptions, animator: &mut A)
                -> Result<LevelSet<S>, LoadError>
            where B: BufRead, A: Animator<Slide = S> {
        let mut lset = LevelSet{ name: String::new(), levels: vec![] };
        let mut block = Block::new();
        let mut buf = Vec::new();
        let mut line = 0;

        if reader.fill_buf()?.starts_with(BOM) {
            reader.consume(BOM.len());
        }
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line += 1;
            if buf.ends_with(b"\n") {
                buf.pop();
                if buf.ends_with(b"\r") {
                    buf.pop();
                }
            }
            // bytes which are not UTF-8 become empty floor
            let row = String::from_utf8_lossy(&buf);
            if row.is_empty() {
                // levels are separated by an empty line
                let name = (lset.levels.len() + 1).to_string();
                if let Some(level) = block.take_level(&name, animator) {
                    lset.levels.push(level);
                }
            } else {
                block.push_row(&row, line, options)?;
            }
        }
        // last level without separator
        let name = (lset.levels.len() + 1).to_string();
        if let Some(level) = block.take_level(&name, animator) {
            lset.levels.push(level);
        }
        Ok(lset)
    }

    fn read_from_xml<B, A>(reader: B, options: &LoadOptions, animator: &mut A)
                -> Result<LevelSet<S>, LoadError>
            where B: BufRead, A: Animator<Slide = S> {
        let mut lset = LevelSet{ name: String::new(), levels: vec![] };

        let mut reader = XmlReader::from_reader(reader);
        let mut buf = Vec::new();
        let mut in_levels = false;
        let mut in_level_collection = false;
        let mut in_title = false;
        // name and rows of current level, text of current row
        let mut level: Option<(String, Block)> = None;
        let mut level_line: Option<String> = None;

        loop {
            match reader.read_event(&mut buf)? {
                XmlEvent::Start(ref e) => {
                    match e.name() {
                        b"SokobanLevels" => {
                            if in_levels {
                                return Err(BadXmlStructure);
                            }
                            in_levels = true;
                        }
                        b"Title" => {
                            if in_level_collection {
                                return Err(BadXmlStructure);
                            }
                            in_title = true;
                        }
                        b"LevelCollection" => {
                            if !in_levels {
                                return Err(BadXmlStructure);
                            }
                            in_level_collection = true;
                        }
                        b"Level" => {
                            if !in_level_collection || level.is_some() {
                                return Err(BadXmlStructure);
                            }
                            let name = level_id(e, &reader)?.unwrap_or_else(
                                    || (lset.levels.len() + 1).to_string());
                            level = Some((name, Block::new()));
                        }
                        b"L" => {
                            if level.is_none() || level_line.is_some() {
                                return Err(BadXmlStructure);
                            }
                            level_line = Some(String::new());
                        }
                        _ => {}
                    }
                }
                XmlEvent::Empty(ref e) => {
                    if e.name() == b"L" {
                        match level.as_mut() {
                            Some((_, block)) => {
                                let line = block.rows.len() + 1;
                                block.push_row("", line, options)?;
                            }
                            None => { return Err(BadXmlStructure); }
                        }
                    }
                }
                XmlEvent::Text(e) => {
                    if let Some(l) = level_line.as_mut() {
                        l.push_str(&e.unescape_and_decode(&reader)?);
                    } else if in_title {
                        lset.name = e.unescape_and_decode(&reader)?.trim().to_string();
                    }
                }
                XmlEvent::End(ref e) => {
                    match e.name() {
                        b"SokobanLevels" => { in_levels = false; }
                        b"Title" => { in_title = false; }
                        b"LevelCollection" => { in_level_collection = false; }
                        b"Level" => {
                            if let Some((name, mut block)) = level.take() {
                                if let Some(lev) = block.take_level(&name, animator) {
                                    lset.levels.push(lev);
                                }
                            }
                        }
                        b"L" => {
                            if let (Some(l), Some((_, block))) =
                                    (level_line.take(), level.as_mut()) {
                                let line = block.rows.len() + 1;
                                block.push_row(l.trim_end(), line, options)?;
                            }
                        }
                        _ => {}
                    }
                }
                XmlEvent::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(lset)
    }
}
