use crate::errors::{FormatRejection, ParserError};
use crate::formats::{DbaParser, ErddapCsvParser};
use crate::model::ParsedGliderFile;

pub trait GliderParser {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<ParsedGliderFile, ParserError>;
}

pub fn parse_glider_file(content: &str) -> Result<ParsedGliderFile, ParserError> {
    let dba = DbaParser::default();
    let erddap = ErddapCsvParser;
    let parsers: [&dyn GliderParser; 2] = [&dba, &erddap];
    parse_with_parsers(content, &parsers)
}

pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn GliderParser],
) -> Result<ParsedGliderFile, ParserError> {
    let mut rejections = Vec::new();

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::WrongFormat { reason, .. }) => {
                rejections.push(FormatRejection {
                    parser: parser.name(),
                    reason,
                });
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::Unrecognized { rejections })
}
