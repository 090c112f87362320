// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("monthbook")
        .version(crate_version!())
        .about("Track monthly income and expenses, close months into a rolling history")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Data file to use instead of the platform default"),
        )
        .subcommand(Command::new("path").about("Print the data file location"))
        .subcommand(
            Command::new("income")
                .about("Record income")
                .arg(Arg::new("amount").required(true).allow_hyphen_values(true)),
        )
        .subcommand(
            Command::new("expense")
                .about("Record an expense")
                .arg(Arg::new("amount").required(true).allow_hyphen_values(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .required(true)
                        .help("Food, Clothing, Education, Health, Shopping, Pet, Furniture or Gift"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").about("List active transactions").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize)),
            ),
        ))
        .subcommand(json_flags(
            Command::new("summary")
                .about("Income, expense and balance for the current month")
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_name("YYYY-MM")
                        .help("Summarize another month's active transactions"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("history").about("Show closed months"),
        ))
        .subcommand(
            Command::new("reset")
                .about("Close the current month and archive transactions")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Close the month even if it has no active transactions"),
                ),
        )
        .subcommand(Command::new("categories").about("List expense categories"))
        .subcommand(
            Command::new("config")
                .about("Read or change settings")
                .subcommand(
                    Command::new("get").arg(
                        Arg::new("key")
                            .required(true)
                            .value_parser(["archive-scope"]),
                    ),
                )
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("key")
                                .required(true)
                                .value_parser(["archive-scope"]),
                        )
                        .arg(Arg::new("value").required(true).help("all | month")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to a file")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv | json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("archived")
                                .long("archived")
                                .action(ArgAction::SetTrue)
                                .help("Include archived transactions"),
                        ),
                )
                .subcommand(
                    Command::new("history")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv | json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}
