
mod property_oracle;
